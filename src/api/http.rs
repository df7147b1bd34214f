//! [ApiClient] over HTTP with `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

use crate::{
    Error,
    api::{
        ApiClient, LogInCredentials, Registration, TransactionFilter,
        wire::{
            error_message, new_transaction_payload, parse_created_transaction, parse_session,
            parse_transaction_list,
        },
    },
    auth::Session,
    transaction::{NewTransaction, Transaction, TransactionId, TransactionKind},
};

/// How long to wait for the backend before giving up on a request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A client for the REST backend.
///
/// All routes live under `{base_url}/api`. Authenticated requests send the
/// session token as a bearer token.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: Client,
    api_base: String,
}

impl HttpApiClient {
    /// Create a client for the backend at `base_url`, e.g.
    /// `http://localhost:5000`.
    ///
    /// # Errors
    ///
    /// Returns [Error::Transport] if the HTTP client cannot be built, e.g.
    /// when the TLS backend fails to initialise.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_base: format!("{}/api", base_url.trim_end_matches('/')),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    fn authorized(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        request.bearer_auth(&session.token)
    }
}

/// Send `request` and read the JSON body, mapping error statuses onto the
/// crate's [Error] variants.
async fn read_json(request: RequestBuilder) -> Result<Value, Error> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        let text = response.text().await?;

        // Some routes answer with an empty body, e.g. deletes.
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        return serde_json::from_str(&text).map_err(|error| {
            tracing::error!("could not parse JSON from the backend: {error}");
            Error::Transport("The server sent a response that could not be read.".to_owned())
        });
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);

    match status {
        StatusCode::UNAUTHORIZED => {
            tracing::warn!("the backend rejected the request as unauthorized: {message:?}");
            Err(Error::Unauthorized)
        }
        StatusCode::NOT_FOUND => Err(Error::NotFound),
        status => {
            tracing::error!("the backend answered with {status}: {body}");
            Err(Error::Transport(message.unwrap_or_else(|| {
                format!("The server answered with an error ({status}).")
            })))
        }
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn log_in(&self, credentials: &LogInCredentials) -> Result<Session, Error> {
        let request = self.http.post(self.url("auth/login")).json(credentials);

        let body = match read_json(request).await {
            Ok(body) => body,
            Err(Error::Unauthorized | Error::NotFound) => return Err(Error::InvalidCredentials),
            // Many backends answer bad credentials with 400 and a message.
            Err(Error::Transport(message)) if message.to_lowercase().contains("invalid") => {
                return Err(Error::InvalidCredentials);
            }
            Err(error) => return Err(error),
        };

        parse_session(body, &credentials.email)
    }

    async fn sign_up(&self, registration: &Registration) -> Result<Session, Error> {
        let request = self.http.post(self.url("auth/register")).json(registration);
        let body = read_json(request).await?;

        parse_session(body, &registration.email)
    }

    async fn log_out(&self, session: &Session) -> Result<(), Error> {
        let request = self.authorized(self.http.post(self.url("auth/logout")), session);
        read_json(request).await?;

        Ok(())
    }

    async fn fetch_transactions(
        &self,
        session: &Session,
        kind: TransactionKind,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, Error> {
        let url = self.url(&format!("{}/get", kind.api_path()));
        let request = self
            .authorized(self.http.get(url), session)
            .query(&filter.query_pairs());
        let body = read_json(request).await?;

        let mut transactions = parse_transaction_list(body, kind)?;
        // The backend may ignore the filter, so apply it here too.
        transactions.retain(|transaction| filter.contains(transaction.date));

        Ok(transactions)
    }

    async fn create_transaction(
        &self,
        session: &Session,
        transaction: &NewTransaction,
    ) -> Result<Transaction, Error> {
        let kind = transaction.kind();
        let url = self.url(&format!("{}/add", kind.api_path()));
        let request = self
            .authorized(self.http.post(url), session)
            .json(&new_transaction_payload(transaction));
        let body = read_json(request).await?;

        parse_created_transaction(body, kind)
    }

    async fn delete_transaction(
        &self,
        session: &Session,
        kind: TransactionKind,
        id: &TransactionId,
    ) -> Result<(), Error> {
        let url = self.url(&format!("{}/{}", kind.api_path(), id));
        let request = self.authorized(self.http.delete(url), session);
        read_json(request).await?;

        Ok(())
    }
}
