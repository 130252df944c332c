/// Stash - Chrome Extension for a reading list of URLs
/// Built with Rust + WASM + Yew

mod background;
pub mod batch;
mod browser;
pub mod delta;
pub mod error;
pub mod notes;
pub mod service;
pub mod settings;
pub mod stash;
pub mod storage;
pub mod transfer;
pub mod ui;
pub mod urls;

pub use error::{Result, StashError};
pub use service::{Downloader, StashService, TabOpener};
pub use storage::{KeyValueStore, MemoryStore};

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the options page
#[wasm_bindgen]
pub fn start_options() {
    yew::Renderer::<ui::options::OptionsPage>::new().render();
}

#[wasm_bindgen]
pub fn start_batch_end() {
    yew::Renderer::<ui::pages::BatchEndPage>::new().render();
}

#[wasm_bindgen]
pub fn start_message_page() {
    yew::Renderer::<ui::pages::MessagePage>::new().render();
}

// Entry point for chrome.commands.onCommand in the background script
#[wasm_bindgen]
pub async fn handle_command(command: String) {
    background::handle_command(&command).await;
}
