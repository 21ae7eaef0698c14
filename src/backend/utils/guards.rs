// src/backend/utils/guards.rs
use crate::error::SwitchError;
use candid::Principal;

/// Rejects the anonymous principal on state-mutating endpoints.
///
/// # Errors
///
/// Returns `SwitchError::NotAuthorized` for an anonymous caller.
pub fn check_not_anonymous(caller: &Principal) -> Result<(), SwitchError> {
    if *caller == Principal::anonymous() {
        Err(SwitchError::NotAuthorized(
            "Anonymous principals cannot perform this operation".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Checks that the caller is the designated admin principal.
///
/// # Errors
///
/// Returns `SwitchError::NotAuthorized` if the caller is not the admin.
pub fn check_admin(admin: &Principal, caller: &Principal) -> Result<(), SwitchError> {
    if caller == admin {
        Ok(())
    } else {
        Err(SwitchError::NotAuthorized(format!(
            "Caller {} is not the admin principal",
            caller
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_rejected() {
        assert!(check_not_anonymous(&Principal::anonymous()).is_err());
        assert!(check_not_anonymous(&Principal::from_slice(&[1])).is_ok());
    }

    #[test]
    fn test_admin_check() {
        let admin = Principal::from_slice(&[9]);
        assert!(check_admin(&admin, &admin).is_ok());
        assert!(check_admin(&admin, &Principal::from_slice(&[1])).is_err());
    }
}
