mod api;
mod components;
mod mapbox;
mod pages;

use dioxus::logger::tracing::Level;
use dioxus::prelude::*;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
}

#[component]
fn Home() -> Element {
    rsx! {
        pages::narrative::Narrative {}
    }
}

const CSS: Asset = asset!("/assets/main.css");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Stylesheet { href: CSS }
        document::Script { src: "https://api.mapbox.com/mapbox-gl-js/v0.44.2/mapbox-gl.js" }
        document::Stylesheet { href: "https://api.mapbox.com/mapbox-gl-js/v0.44.2/mapbox-gl.css" }
        Router::<Route> {}
    }
}

fn main() {
    let _ = dioxus::logger::init(Level::INFO);
    launch(App);
}
