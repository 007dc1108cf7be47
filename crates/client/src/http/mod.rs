use api_types::{
    ErrorBody,
    auth::{Credentials, LoginResponse, MeResponse, Registration, UserInfo},
    expense::{ExpensePayload, ExpenseView},
};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    config::Endpoints,
    error::{AppError, ClientError, Result},
};

/// Thin typed wrapper over the remote REST API.
///
/// It holds no session state: authenticated calls take the bearer token as an
/// argument.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    endpoints: Endpoints,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, endpoints: Endpoints) -> Result<Self> {
        Url::parse(base_url)
            .map_err(|err| AppError::InvalidConfig(format!("base_url {base_url}: {err}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            endpoints,
            http: reqwest::Client::new(),
        })
    }

    pub async fn login(
        &self,
        credentials: &Credentials,
    ) -> std::result::Result<LoginResponse, ClientError> {
        let req = self
            .request(Method::POST, &self.endpoints.login, None)?
            .json(credentials);
        self.send(req).await
    }

    pub async fn register(
        &self,
        registration: &Registration,
    ) -> std::result::Result<(), ClientError> {
        let req = self
            .request(Method::POST, &self.endpoints.register, None)?
            .json(registration);
        self.send_unit(req).await
    }

    pub async fn me(&self, token: &str) -> std::result::Result<UserInfo, ClientError> {
        let req = self.request(Method::GET, &self.endpoints.me, Some(token))?;
        self.send::<MeResponse>(req).await.map(|res| res.user)
    }

    pub async fn logout(&self, token: &str) -> std::result::Result<(), ClientError> {
        let req = self.request(Method::POST, &self.endpoints.logout, Some(token))?;
        self.send_unit(req).await
    }

    pub async fn list_expenses(
        &self,
        token: &str,
    ) -> std::result::Result<Vec<ExpenseView>, ClientError> {
        let req = self.request(Method::GET, &self.endpoints.expenses, Some(token))?;
        self.send(req).await
    }

    /// The created expense in the response body is not needed: the caller
    /// refetches the whole list.
    pub async fn create_expense(
        &self,
        token: &str,
        payload: &ExpensePayload,
    ) -> std::result::Result<(), ClientError> {
        self.send_json(Method::POST, &self.endpoints.expenses, token, payload)
            .await
    }

    pub async fn update_expense(
        &self,
        token: &str,
        id: &str,
        payload: &ExpensePayload,
    ) -> std::result::Result<(), ClientError> {
        let path = self.expense_path(id);
        self.send_json(Method::PUT, &path, token, payload).await
    }

    pub async fn delete_expense(&self, token: &str, id: &str) -> std::result::Result<(), ClientError> {
        let path = self.expense_path(id);
        let req = self.request(Method::DELETE, &path, Some(token))?;
        self.send_unit(req).await
    }

    fn expense_path(&self, id: &str) -> String {
        format!("{}/{}", self.endpoints.expenses.trim_end_matches('/'), id)
    }

    fn url(&self, path: &str) -> std::result::Result<Url, ClientError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&raw).map_err(|err| ClientError::Server(format!("invalid url {raw}: {err}")))
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
    ) -> std::result::Result<RequestBuilder, ClientError> {
        let url = self.url(path)?;
        tracing::debug!(%method, %url, "api request");
        let req = self.http.request(method, url);
        Ok(match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        })
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        token: &str,
        body: &T,
    ) -> std::result::Result<(), ClientError> {
        let req = self.request(method, path, Some(token))?.json(body);
        self.send_unit(req).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> std::result::Result<T, ClientError> {
        let res = req.send().await?;
        let res = check_status(res).await?;
        Ok(res.json::<T>().await?)
    }

    async fn send_unit(&self, req: RequestBuilder) -> std::result::Result<(), ClientError> {
        let res = req.send().await?;
        check_status(res).await?;
        Ok(())
    }
}

async fn check_status(res: Response) -> std::result::Result<Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_default();
    tracing::debug!(%status, message = %body, "api error");

    let err = match status.as_u16() {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        409 => ClientError::Conflict(body),
        400 | 422 => ClientError::Validation(body),
        _ => ClientError::Server(body),
    };
    Err(err)
}
