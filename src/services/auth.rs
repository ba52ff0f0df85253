// src/services/auth.rs

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use bcrypt::{hash, verify};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Store,
    models::auth::{AuthResponse, Claims, Session, SessionEvent, User},
};

const SESSION_EVENTS_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    jwt_secret: String,
    session_ttl: Duration,
    // jti dos tokens encerrados por logout, com a expiração de cada um
    revoked: Arc<RwLock<HashMap<Uuid, DateTime<Utc>>>>,
    events: broadcast::Sender<SessionEvent>,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, jwt_secret: String, session_ttl: Duration) -> Self {
        let (events, _) = broadcast::channel(SESSION_EVENTS_CAPACITY);
        Self {
            store,
            jwt_secret,
            session_ttl,
            revoked: Arc::new(RwLock::new(HashMap::new())),
            events,
        }
    }

    /// Avisos de login/logout para quem precisa reagir (ex.: o espelho do estoque).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Cria o operador se ele ainda não existir (bootstrap pelo .env).
    pub async fn ensure_operator(&self, email: &str, password: &str) -> Result<User, AppError> {
        if let Some(user) = self.store.find_user_by_email(email).await? {
            return Ok(user);
        }

        let password_clone = password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let user = self.store.create_user(email, &hashed_password).await?;
        tracing::info!("👤 Operador criado: {}", user.email);
        Ok(user)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            tracing::warn!("🔒 Acesso negado para {}", email);
            return Err(AppError::InvalidCredentials);
        }

        let (token, session) = self.create_token(&user)?;
        tracing::info!("✅ Bem-vindo, {}!", user.email);
        // Sem ninguém escutando o envio falha; não é erro
        let _ = self.events.send(SessionEvent::SignedIn(session.clone()));

        Ok(AuthResponse { token, session })
    }

    pub async fn validate_token(&self, token: &str) -> Result<Session, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;
        let claims = token_data.claims;

        if self.is_revoked(claims.jti) {
            return Err(AppError::InvalidToken);
        }

        let user = self
            .store
            .find_user_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        Ok(Session {
            user_id: user.id,
            email: user.email,
            token_id: claims.jti,
            expires_at: DateTime::from_timestamp(claims.exp as i64, 0).unwrap_or_default(),
        })
    }

    /// Encerra a sessão: o token passa a ser recusado.
    pub fn logout(&self, session: &Session) {
        if let Ok(mut revoked) = self.revoked.write() {
            // Token vencido já é recusado pelo `exp`, não precisa ficar na lista
            let now = Utc::now();
            revoked.retain(|_, expires_at| *expires_at > now);
            revoked.insert(session.token_id, session.expires_at);
        }
        tracing::info!("👋 Sessão encerrada: {}", session.email);
        let _ = self.events.send(SessionEvent::SignedOut(session.clone()));
    }

    fn is_revoked(&self, jti: Uuid) -> bool {
        self.revoked
            .read()
            .map(|revoked| revoked.contains_key(&jti))
            .unwrap_or(true)
    }

    fn create_token(&self, user: &User) -> Result<(String, Session), AppError> {
        let now = Utc::now();
        let expires_at = now + self.session_ttl;
        let jti = Uuid::new_v4();

        let claims = Claims {
            sub: user.id,
            jti,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?;

        let session = Session {
            user_id: user.id,
            email: user.email.clone(),
            token_id: jti,
            expires_at: DateTime::from_timestamp(claims.exp as i64, 0).unwrap_or(expires_at),
        };
        Ok((token, session))
    }
}
