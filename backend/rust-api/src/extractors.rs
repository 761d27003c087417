use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};

use crate::handlers::ApiError;

/// JSON extractor whose rejections use the `{code, msg, aiRes}` error body.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: serde::de::DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                tracing::warn!("Rejected request body: {}", rejection);
                Err(ApiError::bad_request(rejection_message(&rejection)).into_response())
            }
        }
    }
}

fn rejection_message(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "请设置 post 请求的请求头 Headers 中的 Content-Type 为 application/json"
        }
        JsonRejection::BytesRejection(_) => "读取请求体失败",
        _ => "请求体解析错误，请输入正确的json格式的数据(model/language/type/keyword 均是string类型)",
    }
}
