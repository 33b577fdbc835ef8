use crate::auth::{controller::AuthController, service::AuthService};
use crate::config::Config;
use crate::constants::{BAD_REQUEST, NOT_FOUND, TOO_MANY_REQUESTS};
use crate::investment::{
    clock::SystemClock,
    controller::InvestmentController,
    gains::GainsCalculator,
    repository::{InvestmentRepository, InvestmentStore},
    service::InvestmentService,
    tax::TaxPolicy,
    withdrawal::WithdrawalEngine,
};
use crate::rate_limit::RateLimiter;
use crate::req::Method::{DELETE, GET, POST, PUT};
use crate::req::Request;
use crate::user::{controller::UserController, repository::UserRepository, service::UserService};
use anyhow::{Context, Result};
use sqlx::AnyPool;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot::Receiver;

pub struct AppState<S: InvestmentStore> {
    pub auth: AuthController,
    pub users: UserController,
    pub investments: InvestmentController<S>,
    pub limiter: RateLimiter,
}

impl AppState<InvestmentRepository> {
    /// Wires the SQL-backed services for `pool`.
    pub fn from_pool(pool: AnyPool, config: &Config) -> Self {
        let users = Arc::new(UserService::new(UserRepository::new(pool.clone())));
        let engine = WithdrawalEngine::new(
            GainsCalculator::new(config.interest_monthly_rate),
            TaxPolicy::default(),
        );
        let investments = InvestmentService::new(
            InvestmentRepository::new(pool),
            engine,
            Arc::new(SystemClock),
        );
        AppState {
            auth: AuthController::new(AuthService::new(users.clone(), config.jwt.clone())),
            users: UserController::new(users),
            investments: InvestmentController::new(investments),
            limiter: RateLimiter::new(
                config.rate_limit_max,
                Duration::from_secs(config.rate_limit_window_secs),
            ),
        }
    }
}

pub struct Server<S: InvestmentStore> {
    state: Arc<AppState<S>>,
}

impl<S: InvestmentStore + 'static> Server<S> {
    pub fn new(state: Arc<AppState<S>>) -> Self {
        Self { state }
    }

    pub async fn start(&self, address: &str, mut shutdown_rx: Receiver<()>) -> Result<()> {
        let listener = TcpListener::bind(address)
            .await
            .with_context(|| format!("failed to bind {}", address))?;
        tracing::info!("Server running on http://{}", address);

        loop {
            tokio::select! {
                conn = listener.accept() => {
                    let (mut stream, peer) = conn?;

                    let state = Arc::clone(&self.state);

                    tokio::spawn(async move {
                        let (reader, writer) = stream.split();
                        if let Err(e) = Self::handle_client(reader, writer, &state, peer.ip()).await {
                            tracing::warn!("Connection error: {:#}", e);
                        }
                    });
                }
                // Shutdown signal check
                _ = &mut shutdown_rx => {
                    tracing::info!("Shutting down server...");
                    break;
                }
            }
        }
        Ok(())
    }

    pub async fn handle_client<Reader, Writer>(
        reader: Reader,
        mut writer: Writer,
        state: &Arc<AppState<S>>,
        peer: IpAddr,
    ) -> Result<()>
    where
        Reader: AsyncRead + Unpin,
        Writer: AsyncWrite + Unpin,
    {
        let (status_line, content) = if !state.limiter.check(peer).await {
            tracing::warn!("rate limit exceeded for {}", peer);
            (
                TOO_MANY_REQUESTS.to_string(),
                r#"{"message":"Too many requests"}"#.to_string(),
            )
        } else {
            match Request::new(reader).await {
                Ok(request) => {
                    tracing::debug!(method = ?request.method, path = %request.path, "request");
                    Self::route(&request, state).await
                }
                Err(e) => {
                    tracing::warn!("Failed to read request: {:#}", e);
                    (
                        BAD_REQUEST.to_string(),
                        r#"{"message":"Malformed request"}"#.to_string(),
                    )
                }
            }
        };

        writer
            .write_all(format!("{}{}", status_line, content).as_bytes())
            .await
            .context("Failed to write")?;
        writer.flush().await.context("Failed to flush")
    }

    async fn route(request: &Request, state: &AppState<S>) -> (String, String) {
        let segments = request.segments();
        let protected = matches!(segments.as_slice(), ["investments", ..] | ["users", _, ..]);
        if protected {
            if let Err(err) = state.auth.service().authenticate(&request.headers) {
                return err.into_response();
            }
        }

        match (&request.method, segments.as_slice()) {
            (POST, ["auth", "login"]) => state.auth.login(&request.body).await,
            (POST, ["auth", "register"]) => state.auth.register(&request.body).await,
            (GET, ["auth", "validate"]) => state.auth.validate(&request.headers),

            (POST, ["users"]) => state.users.create(&request.body).await,
            (GET, ["users", id]) => state.users.find_one(id).await,
            (PUT, ["users", id]) => state.users.update(id, &request.body).await,
            (DELETE, ["users", id]) => state.users.remove(id).await,

            (POST, ["investments"]) => state.investments.create(&request.body).await,
            (GET, ["investments"]) => state.investments.list(&request.query).await,
            (GET, ["investments", id]) => state.investments.get(id).await,
            (POST, ["investments", id, "withdraw"]) => {
                state.investments.withdraw(id, &request.body).await
            }
            _ => (
                NOT_FOUND.to_string(),
                r#"{"message":"404 Not Found"}"#.to_string(),
            ),
        }
    }
}
