//! Form-facing helpers: user messages for sign-up results and the auth
//! callback redirect.

use crate::error::SignUpError;
use crate::store::AuthSnapshot;
use crate::types::SignUpSuccess;

pub const MSG_SYNC_ERROR: &str = "Error al sincronizar usuario con la base de datos.";
pub const MSG_PROVIDER_ERROR: &str = "Error en el registro con Supabase.";
pub const MSG_CONFIRMATION_PENDING: &str =
    "Registro iniciado. Por favor, revisa tu correo electrónico para confirmar tu cuenta.";
pub const MSG_REGISTERED: &str =
    "¡Registro exitoso! Por favor, revisa tu correo electrónico para confirmar tu cuenta.";
pub const MSG_UNEXPECTED_RESPONSE: &str = "Respuesta inesperada del servidor de autenticación.";

pub const HOME_PATH: &str = "/";
pub const VERIFICATION_FAILED_PATH: &str = "/login?error=verification_failed";

/// Inline message shown under the sign-up form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpFeedback {
    Error(String),
    Success(String),
}

impl SignUpFeedback {
    pub fn from_result(result: &Result<SignUpSuccess, SignUpError>) -> Self {
        match result {
            Ok(SignUpSuccess { session: None, .. }) => {
                SignUpFeedback::Success(MSG_CONFIRMATION_PENDING.to_string())
            }
            Ok(SignUpSuccess {
                session: Some(_), ..
            }) => SignUpFeedback::Success(MSG_REGISTERED.to_string()),
            Err(SignUpError::Validation(message)) => SignUpFeedback::Error(message.clone()),
            Err(SignUpError::Sync { source, .. }) => {
                SignUpFeedback::Error(or_default(source.to_string(), MSG_SYNC_ERROR))
            }
            Err(SignUpError::Provider(e)) => {
                SignUpFeedback::Error(or_default(e.to_string(), MSG_PROVIDER_ERROR))
            }
            Err(SignUpError::Unknown) => SignUpFeedback::Error(MSG_UNEXPECTED_RESPONSE.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SignUpFeedback::Error(_))
    }

    pub fn message(&self) -> &str {
        match self {
            SignUpFeedback::Error(message) | SignUpFeedback::Success(message) => message,
        }
    }
}

fn or_default(message: String, default: &str) -> String {
    if message.trim().is_empty() {
        default.to_string()
    } else {
        message
    }
}

/// Where the email-confirmation landing page sends the user.
///
/// `None` while the auth state is still loading.
pub fn auth_callback_redirect(snapshot: &AuthSnapshot) -> Option<&'static str> {
    if snapshot.is_loading {
        None
    } else if snapshot.is_authenticated() {
        Some(HOME_PATH)
    } else {
        Some(VERIFICATION_FAILED_PATH)
    }
}
