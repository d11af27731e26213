//! Fortuna - command-line client
//!
//! Wires the reqwest transport, the file token store and the session
//! manager into one authenticated client, and runs CLI commands against it.

pub mod cli;
pub mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use fortuna_application::{
    ApiError, AuthService, AuthenticatedHttpClient, FortuneService, NotificationService,
    RewardService, SessionController, SessionEvent, SessionManager, TransportError,
};
use fortuna_domain::RegisterRequest;
use fortuna_infrastructure::{FileTokenStore, ReqwestTransport};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::cli::Command;
use crate::settings::{Settings, SettingsError};

/// Errors surfaced to the user.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Settings could not be loaded.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// The HTTP client could not be built.
    #[error("cannot create HTTP client: {0}")]
    Transport(#[from] TransportError),

    /// An API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A local file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Command output could not be encoded.
    #[error("cannot encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// The assembled client and its services.
pub struct App {
    session: Arc<SessionManager>,
    auth: AuthService<ReqwestTransport>,
    fortune: FortuneService<ReqwestTransport>,
    rewards: RewardService<ReqwestTransport>,
    notifications: NotificationService<ReqwestTransport>,
}

impl App {
    /// Builds the client stack from settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials path is unknown or the
    /// transport cannot be created.
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let transport = ReqwestTransport::new(&settings.transport())?;
        let tokens = Arc::new(FileTokenStore::new(settings.credentials_path()?));
        let session = Arc::new(SessionManager::new());
        let client = Arc::new(AuthenticatedHttpClient::with_config(
            transport,
            tokens,
            Arc::clone(&session) as Arc<dyn SessionController>,
            settings.client.clone(),
        ));

        Ok(Self {
            auth: AuthService::new(Arc::clone(&client), Arc::clone(&session)),
            fortune: FortuneService::new(Arc::clone(&client)),
            rewards: RewardService::new(Arc::clone(&client)),
            notifications: NotificationService::new(client),
            session,
        })
    }

    /// Session state shared with the client.
    #[must_use]
    pub const fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Restores a stored session, then runs `command`.
    ///
    /// Returns the command's result as JSON.
    ///
    /// # Errors
    ///
    /// Returns the first failure, API errors included.
    pub async fn run(&self, command: Command) -> Result<Value, AppError> {
        let mut events = self.session.events();
        let result = self.execute(command).await;
        while let Ok(event) = events.try_recv() {
            log_session_event(&event);
        }
        result
    }

    async fn execute(&self, command: Command) -> Result<Value, AppError> {
        self.auth.restore().await?;

        let output = match command {
            Command::Login { email, password } => {
                to_value(&self.auth.login(&email, &password).await?)?
            }
            Command::Register {
                name,
                email,
                password,
                birth_date,
            } => {
                let request = RegisterRequest {
                    name,
                    email,
                    password,
                    birth_date,
                };
                to_value(&self.auth.register(&request).await?)?
            }
            Command::Logout => {
                self.auth.logout().await?;
                json!({"signedOut": true})
            }
            Command::Profile => to_value(&self.auth.profile().await?)?,
            Command::Horoscope { sign, period } => {
                to_value(&self.fortune.horoscope(sign, period).await?)?
            }
            Command::Tarot { question, spread } => {
                to_value(&self.fortune.tarot_reading(&question, spread.into()).await?)?
            }
            Command::Coffee { photos, note } => {
                let mut images = Vec::with_capacity(photos.len());
                for path in photos {
                    let bytes = tokio::fs::read(&path)
                        .await
                        .map_err(|source| AppError::Io { path, source })?;
                    images.push(bytes);
                }
                to_value(&self.fortune.coffee_reading(&images, note).await?)?
            }
            Command::Wheel => to_value(&self.rewards.wheel_status().await?)?,
            Command::Spin => to_value(&self.rewards.spin_wheel().await?)?,
            Command::Notifications => to_value(&self.notifications.list().await?)?,
            Command::Read { id } => {
                self.notifications.mark_read(&id).await?;
                json!({"read": id})
            }
        };
        Ok(output)
    }
}

fn log_session_event(event: &SessionEvent) {
    match event {
        SessionEvent::SignedIn { user_id } => {
            info!(user_id = user_id.as_deref().unwrap_or("-"), "signed in");
        }
        SessionEvent::SignedOut => info!("signed out"),
        SessionEvent::ForcedLogout => {
            warn!("session expired, sign in again with `fortuna login`");
        }
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, AppError> {
    Ok(serde_json::to_value(value)?)
}
