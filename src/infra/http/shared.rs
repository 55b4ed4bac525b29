use askama::{Error as AskamaError, Template};
use datastar::prelude::ElementPatchMode;
use std::time::Duration;
use uuid::Uuid;

use super::selectors::TOAST_STACK;
use crate::{
    application::{error::HttpError, stream::StreamBuilder},
    presentation::views::{TemplateRenderError, toast},
};

#[derive(Clone)]
pub(super) struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub text: String,
    pub ttl: Duration,
}

#[derive(Clone, Copy)]
pub(super) enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    fn as_variant(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }
}

const DEFAULT_TOAST_TTL: Duration = Duration::from_millis(6000);

impl Toast {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ToastKind::Success,
            text: text.into(),
            ttl: DEFAULT_TOAST_TTL,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ToastKind::Error,
            text: text.into(),
            ttl: DEFAULT_TOAST_TTL,
        }
    }
}

pub(super) fn push_toasts(stream: &mut StreamBuilder, toasts: &[Toast]) -> Result<(), HttpError> {
    let view_items = toasts
        .iter()
        .map(|toast| toast::ToastItemView {
            id: toast.id.to_string(),
            kind: toast.kind.as_variant(),
            text: toast.text.clone(),
            ttl_ms: toast.ttl.as_millis() as u64,
        })
        .collect::<Vec<_>>();

    let template = toast::ToastStackTemplate { toasts: view_items };

    let html = template.render().map_err(|err| {
        template_render_http_error(
            "infra::http::push_toasts",
            "Template rendering failed",
            err,
        )
    })?;

    stream.push_patch(html, TOAST_STACK, ElementPatchMode::Replace);
    Ok(())
}

pub(super) fn datastar_replace(selector: &str, html: String) -> StreamBuilder {
    let mut stream = StreamBuilder::new();
    stream.push_patch(html, selector, ElementPatchMode::Replace);
    stream
}

pub(super) fn template_render_http_error(
    source: &'static str,
    message: &'static str,
    err: AskamaError,
) -> HttpError {
    HttpError::from(TemplateRenderError::new(source, message, err))
}
