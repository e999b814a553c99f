use std::future::Future;

use crate::core::{CallContext, FinanceError};

/// Run a transport future, racing the context's cancellation token if it has one.
async fn cancellable<F, T>(fut: F, ctx: Option<&CallContext>) -> Result<T, FinanceError>
where
    F: Future<Output = Result<T, reqwest::Error>>,
{
    match ctx.and_then(CallContext::cancellation) {
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => Err(FinanceError::Cancelled),
            res = fut => res.map_err(FinanceError::from),
        },
        None => fut.await.map_err(FinanceError::from),
    }
}

/// Execute a prepared request on the shared client.
pub(crate) async fn send(
    http: &reqwest::Client,
    req: reqwest::Request,
    ctx: Option<&CallContext>,
) -> Result<reqwest::Response, FinanceError> {
    cancellable(http.execute(req), ctx).await
}

/// Read the whole response body as text.
pub(crate) async fn get_text(
    resp: reqwest::Response,
    ctx: Option<&CallContext>,
) -> Result<String, FinanceError> {
    cancellable(resp.text(), ctx).await
}
