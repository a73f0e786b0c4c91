use wasm_bindgen::prelude::*;
use stellar_engine::*;

mod backdrop;
mod bodies;
mod comet;
mod config;
mod emitters;
mod game;
mod orbit;
mod ui;
use game::SolarSystem;

stellar_web::export_game!(SolarSystem, "solar-system");

/// Fact sheet for the named body as JSON, or an empty string when unknown.
#[wasm_bindgen]
pub fn get_body_info(name: &str) -> String {
    with_runner(|r| r.game().body_info_json(name))
        .flatten()
        .unwrap_or_default()
}
