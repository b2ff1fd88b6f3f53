//! HTTP front end: one page at `/` that accepts a PDF upload and shows the
//! generated flashcards.

use std::sync::Arc;

use axum::Router;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::Html;
use axum::routing::get;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use flashcards_core::{Completer, Config, TextExtractor, Upload, process_upload};

pub mod view;

use view::{PageView, render_page};

/// Largest accepted request body.
pub const MAX_UPLOAD_BYTES: usize = 3 * 1024 * 1024;

/// Multipart field carrying the PDF.
pub const UPLOAD_FIELD: &str = "pdf";

/// Shared, read-only state for all requests.
pub struct AppState<E: ?Sized, C> {
    pub extractor: Arc<E>,
    pub completer: C,
    pub config: Config,
}

impl<E: ?Sized, C> AppState<E, C> {
    pub fn new(extractor: Arc<E>, completer: C, config: Config) -> Self {
        Self {
            extractor,
            completer,
            config,
        }
    }
}

/// Build the application router.
///
/// Bodies larger than `max_upload_bytes` are answered with 413 before the
/// upload handler runs.
pub fn router<E, C>(state: AppState<E, C>, max_upload_bytes: usize) -> Router
where
    E: TextExtractor + ?Sized + 'static,
    C: Completer + 'static,
{
    Router::new()
        .route("/", get(index).post(upload::<E, C>))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

async fn index() -> Html<String> {
    Html(render_page(&PageView::default()))
}

async fn upload<E, C>(
    State(state): State<Arc<AppState<E, C>>>,
    mut multipart: Multipart,
) -> Result<Html<String>, MultipartError>
where
    E: TextExtractor + ?Sized + 'static,
    C: Completer + 'static,
{
    let upload = read_upload(&mut multipart).await?;
    let filename = upload.as_ref().map(|u| u.filename.clone()).unwrap_or_default();

    let view = match process_upload(
        upload,
        state.extractor.clone(),
        &state.completer,
        &state.config,
    )
    .await
    {
        Ok(flashcards) => {
            tracing::info!(%filename, count = flashcards.len(), "generated flashcards");
            PageView::with_flashcards(flashcards)
        }
        Err(e) => {
            tracing::warn!(%filename, error = %e, "flashcard generation failed");
            PageView::with_error(e.to_string())
        }
    };

    Ok(Html(render_page(&view)))
}

/// Pull the `pdf` file field out of the form.
///
/// A missing field, or one submitted without a filename (no file chosen),
/// yields `None`.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        tracing::debug!(%filename, bytes = data.len(), "received upload");

        if filename.is_empty() {
            return Ok(None);
        }
        return Ok(Some(Upload::new(filename, data.to_vec())));
    }
    Ok(None)
}
