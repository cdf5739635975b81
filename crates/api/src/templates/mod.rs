use maud::{html, Markup, DOCTYPE};

/// The index page: a plain listing of the available routes.
pub fn home_page(api_base: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "Climate API" }
            }
            body {
                h1 { "Welcome to the Climate API" }
                h2 { "Available Routes:" }
                ul {
                    li { a href="/api/v1.0/precipitation" { "precipitation" } }
                    li { a href="/api/v1.0/stations" { "stations" } }
                    li { a href="/api/v1.0/tobs" { "tobs" } }
                    li { code { "/api/v1.0/start/{start}" } }
                    li { code { "/api/v1.0/start_end/{start}/{end}" } }
                }
                p {
                    "Dates use the YYYY-MM-DD format. Full API documentation at "
                    a href={ (api_base) "/docs" } { (api_base) "/docs" }
                }
            }
        }
    }
}
