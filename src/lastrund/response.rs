// SPDX-FileCopyrightText: 2023 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception

use std::{
    convert::Infallible,
    pin::Pin,
    task::{Context, Poll},
};

use http_body::{Body, Frame, SizeHint};
use hyper::{StatusCode, body::Bytes};

pub const JSON: &str = "application/json";
pub const HTML: &str = "text/html; charset=utf-8";

pub struct BodyKind {
    pub status_code: StatusCode,
    pub content_type: Option<&'static str>,
    pub content: BodyKindContent,
}

/// Implements the hyper http body types
pub enum BodyKindContent {
    /// Empty body
    Empty,
    /// Static binary buffer
    Binary(Bytes),
}

macro_rules! internal_server_error {
    ($e:expr) => {{
        tracing::warn!(error = %$e, "Unexpected error occurred");
        $crate::response::BodyKind::no_content(hyper::StatusCode::INTERNAL_SERVER_ERROR)
    }};
}
pub(crate) use internal_server_error;

impl BodyKind {
    pub fn no_content(status_code: StatusCode) -> Self {
        Self {
            status_code,
            content_type: None,
            content: BodyKindContent::Empty,
        }
    }

    pub fn json_content(status_code: StatusCode, content: String) -> Self {
        Self {
            status_code,
            content_type: Some(JSON),
            content: BodyKindContent::Binary(content.into()),
        }
    }

    pub fn html_content(status_code: StatusCode, content: String) -> Self {
        Self {
            status_code,
            content_type: Some(HTML),
            content: BodyKindContent::Binary(content.into()),
        }
    }

    pub fn into_response(self) -> hyper::Response<BodyKindContent> {
        let rb = hyper::Response::builder().status(self.status_code);
        let rb = match (&self.content, self.content_type) {
            (BodyKindContent::Binary(x), Some(content_type)) => rb
                .header(hyper::header::CONTENT_TYPE, content_type)
                .header(hyper::header::CONTENT_LENGTH, x.len()),
            (BodyKindContent::Binary(x), None) => rb.header(hyper::header::CONTENT_LENGTH, x.len()),
            (BodyKindContent::Empty, _) => rb.header(hyper::header::CONTENT_LENGTH, 0),
        };
        // status and headers are statically valid
        rb.body(self.content)
            .unwrap_or_else(|_| hyper::Response::new(BodyKindContent::Empty))
    }
}

impl Body for BodyKindContent {
    type Data = Bytes;
    type Error = Infallible;

    fn is_end_stream(&self) -> bool {
        matches!(self, BodyKindContent::Empty)
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            BodyKindContent::Empty => SizeHint::with_exact(0),
            BodyKindContent::Binary(b) => SizeHint::with_exact(b.len() as u64),
        }
    }

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        match this {
            BodyKindContent::Empty => Poll::Ready(None),
            BodyKindContent::Binary(b) => {
                let data = b.clone();
                *this = BodyKindContent::Empty;
                Poll::Ready(Some(Ok(Frame::data(data))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    #[tokio::test]
    async fn binary_is_sent_once() {
        let response = BodyKind::json_content(StatusCode::OK, "[]".to_string()).into_response();
        assert_eq!(response.headers()[hyper::header::CONTENT_TYPE], JSON);
        assert_eq!(response.headers()[hyper::header::CONTENT_LENGTH], "2");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"[]");
    }

    #[tokio::test]
    async fn empty() {
        let response = BodyKind::no_content(StatusCode::BAD_GATEWAY).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.headers().get(hyper::header::CONTENT_TYPE).is_none());
        assert!(response.body().is_end_stream());
    }
}
