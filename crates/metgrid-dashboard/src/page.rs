//! Grid page and its stylesheet.
//!
//! The page embeds the current container markup. A meta refresh at the grid
//! refresh interval makes browsers pick up rewritten image sources.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};

use crate::app_state::AppState;

const STYLE_CSS: &str = include_str!("../assets/style.css");

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let grid = state
        .container()
        .map(|c| c.to_html())
        .unwrap_or_default();
    let refresh_secs = state.cfg().grid.refresh_interval().as_secs().max(1);

    Html(format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <meta http-equiv=\"refresh\" content=\"{refresh_secs}\">\n\
         <title>Metrics</title>\n\
         <link rel=\"stylesheet\" href=\"/css/style.css\">\n\
         </head>\n\
         <body>\n\
         <main class=\"container\">\n\
         <h1>Metrics</h1>\n\
         {grid}\n\
         </main>\n\
         </body>\n\
         </html>\n"
    ))
}

pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], STYLE_CSS)
}
