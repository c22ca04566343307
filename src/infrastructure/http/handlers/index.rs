//! Index Handler - 首页，列出所有 Feed

use axum::{extract::State, response::Html};
use std::fmt::Write;
use std::sync::Arc;

use crate::domain::Location;
use crate::infrastructure::http::state::AppState;

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let base = state.renderer.base_url();
    let settings = &state.settings;

    let mut links = String::new();
    for kind in ["weekly", "daily"] {
        let _ = writeln!(
            links,
            "    <li><a href=\"{base}/feeds/{kind}\">/feeds/{kind}</a> - {kind} feed (diaspora)</li>"
        );
        for location in [Location::Diaspora, Location::Israel] {
            let _ = writeln!(
                links,
                "    <li><a href=\"{base}/feeds/{kind}/{location}\">/feeds/{kind}/{location}</a> - {} schedule</li>",
                location.title()
            );
        }
    }

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Torah RSS Feeds</title></head>
<body>
  <h1>Torah RSS Feeds</h1>
  <ul>
{links}  </ul>
  <p>Weekly feeds cover the next {weekly} portions. Daily feeds cover the next {daily} portions, each divided into seven daily readings.</p>
  <p>Weekly feeds refresh every {weekly_hours} hours, daily feeds every {daily_hours} hours.</p>
  <p>JSON: <a href="{base}/api/schedule">/api/schedule</a>, <a href="{base}/api/stats">/api/stats</a></p>
</body>
</html>
"#,
        weekly = settings.weekly_weeks,
        daily = settings.daily_weeks,
        weekly_hours = settings.weekly_ttl.as_secs() / 3600,
        daily_hours = settings.daily_ttl.as_secs() / 3600,
    ))
}
