//! Static credential check for the two built-in operators

use crate::error::{Result, TrieneError};
use once_cell::sync::Lazy;
use triene_types::{Role, Session};

struct Credential {
    email: &'static str,
    password: &'static str,
    user_id: u64,
    name: &'static str,
    role: Role,
}

static CREDENTIALS: Lazy<Vec<Credential>> = Lazy::new(|| {
    vec![
        Credential {
            email: "admin@triene.com",
            password: "admin",
            user_id: 1,
            name: "Administrador",
            role: Role::Admin,
        },
        Credential {
            email: "user@triene.com",
            password: "user",
            user_id: 2,
            name: "Vendedor",
            role: Role::User,
        },
    ]
});

/// Verify a credential pair and open a session
pub fn authenticate(email: &str, password: &str) -> Result<Session> {
    let email = email.trim();

    let credential = CREDENTIALS
        .iter()
        .find(|c| c.email.eq_ignore_ascii_case(email) && c.password == password)
        .ok_or_else(|| {
            log::warn!("Rejected login attempt for {}", email);
            TrieneError::Auth("Invalid email or password".to_string())
        })?;

    log::info!("Operator {} logged in as {:?}", credential.email, credential.role);

    Ok(Session {
        user_id: credential.user_id,
        name: credential.name.to_string(),
        email: credential.email.to_string(),
        role: credential.role,
    })
}

/// Settings and flow administration are admin-only
pub fn require_admin(session: &Session) -> Result<()> {
    if session.is_admin() {
        Ok(())
    } else {
        Err(TrieneError::Auth(format!("{} is not an administrator", session.email)))
    }
}
