use crate::error::AppError;
use actix_web::web;
use bcrypt::{hash, verify};

/// Hashes on the blocking pool; bcrypt at cost 12 takes hundreds of milliseconds.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    let hashed = web::block(move || hash(password, cost)).await??;
    Ok(hashed)
}

pub async fn verify_password(password: String, hashed_password: String) -> Result<bool, AppError> {
    let matches = web::block(move || verify(password, &hashed_password)).await??;
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_password_hashing_and_verification() {
        let hashed = hash_password("test_password123".to_string(), 4)
            .await
            .unwrap();
        assert!(hashed.starts_with("$2"));

        assert!(verify_password("test_password123".to_string(), hashed.clone())
            .await
            .unwrap());
        assert!(!verify_password("wrong_password".to_string(), hashed)
            .await
            .unwrap());
    }

    #[actix_rt::test]
    async fn test_hashes_are_salted() {
        let first = hash_password("same".to_string(), 4).await.unwrap();
        let second = hash_password("same".to_string(), 4).await.unwrap();
        assert_ne!(first, second);
    }

    #[actix_rt::test]
    async fn test_verify_with_invalid_hash() {
        match verify_password("test_password123".to_string(), "invalidhashformat".to_string())
            .await
        {
            Err(AppError::InternalServerError(_)) | Ok(false) => {}
            Ok(true) => panic!("Password verification should fail for invalid hash format"),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }
}
