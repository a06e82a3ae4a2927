// src/services/auth_service.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, InviteCode, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self {
            user_repo,
            jwt_secret,
            pool,
        }
    }

    // Registro exige um código de convite não utilizado. Criação do usuário
    // e consumo do código acontecem na mesma transação: ou os dois entram,
    // ou nenhum.
    pub async fn register_user(
        &self,
        username: &str,
        password: &str,
        invite_code: &str,
    ) -> Result<String, AppError> {
        // 1. Hashing (fora da transação, não toca no banco)
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        // 2. Trava e valida o convite
        self.user_repo
            .get_unused_invite_for_update(&mut *tx, invite_code)
            .await?
            .ok_or(AppError::InvalidInviteCode)?;

        // 3. O primeiro usuário da instalação vira admin
        let is_admin = self.user_repo.count_users(&mut *tx).await? == 0;

        // 4. Cria o usuário
        let new_user = self
            .user_repo
            .create_user(&mut *tx, username, &hashed_password, is_admin)
            .await?;

        // 5. Consome o convite (se falhar, o usuário criado acima é desfeito)
        let consumed = self
            .user_repo
            .mark_invite_used(&mut *tx, invite_code, new_user.id)
            .await?;
        if consumed != 1 {
            return Err(AppError::InvalidInviteCode);
        }

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!("🔗 Usuário {} registrado via convite.", new_user.username);
        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    // Cunhar convites é operação administrativa.
    pub async fn create_invite(&self, requester: &User) -> Result<InviteCode, AppError> {
        if !requester.is_admin {
            return Err(AppError::Forbidden);
        }

        let code = format!(
            "CONVITE-{}",
            Uuid::new_v4().simple().to_string()[..8].to_uppercase()
        );
        self.user_repo
            .create_invite(&self.pool, &code, requester.id)
            .await
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
