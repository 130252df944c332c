/// Bridge to the extension APIs (storage, tabs, downloads, notifications)

use crate::error::{Result, StashError, failure_message};
use crate::service::{Downloader, StashService, TabOpener};
use crate::storage::KeyValueStore;
use crate::transfer::ExportFile;
use crate::urls::sanitize_url;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, Url};

// Import JS bridge functions
#[wasm_bindgen(module = "/js/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn createTabs(urls: JsValue) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getActiveTabUrl() -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn downloadUrl(url: &str, filename: &str) -> std::result::Result<(), JsValue>;

    fn showNotification(message: &str);

    #[wasm_bindgen(js_name = openOptionsPage)]
    fn open_options_page_js();
}

fn js_error(e: JsValue) -> StashError {
    StashError::Browser(format!("{:?}", e))
}

/// chrome.storage.local
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeStorage;

impl KeyValueStore for ChromeStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let value_js = getStorage(key)
            .await
            .map_err(|e| StashError::Storage(format!("Failed to get {}: {:?}", key, e)))?;

        if value_js.is_null() || value_js.is_undefined() {
            return Ok(None);
        }

        serde_wasm_bindgen::from_value(value_js)
            .map(Some)
            .map_err(|e| StashError::Storage(format!("Failed to parse {}: {:?}", key, e)))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        // maps must cross as plain objects, not JS Map
        let value_js = value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| StashError::Storage(format!("Failed to serialize {}: {:?}", key, e)))?;

        setStorage(key, value_js)
            .await
            .map_err(|e| StashError::Storage(format!("Failed to save {}: {:?}", key, e)))
    }
}

/// Service bound to the browser's storage
pub fn stash_service() -> StashService<ChromeStorage> {
    StashService::new(ChromeStorage)
}

/// chrome.tabs.create for every URL, inactive, requested in list order
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeTabs;

impl TabOpener for ChromeTabs {
    async fn open_tabs(&self, urls: &[String]) -> Result<()> {
        let urls_js = serde_wasm_bindgen::to_value(urls)
            .map_err(|e| StashError::Browser(format!("Failed to serialize: {:?}", e)))?;

        createTabs(urls_js).await.map_err(js_error)
    }
}

/// Object URL for an export blob, revoked when dropped
pub struct ObjectUrl {
    url: String,
}

impl ObjectUrl {
    pub fn for_file(file: &ExportFile) -> Result<ObjectUrl> {
        let parts = js_sys::Array::of1(&JsValue::from_str(&file.contents));
        let options = BlobPropertyBag::new();
        options.set_type(&file.mime);

        let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(js_error)?;
        let url = Url::create_object_url_with_blob(&blob).map_err(js_error)?;

        Ok(ObjectUrl { url })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        if let Err(e) = Url::revoke_object_url(&self.url) {
            log::warn!("Failed to revoke {}: {:?}", self.url, e);
        }
    }
}

/// chrome.downloads with a save-as prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct BlobDownloader;

impl Downloader for BlobDownloader {
    async fn download(&self, file: ExportFile) -> Result<()> {
        let object_url = ObjectUrl::for_file(&file)?;
        downloadUrl(object_url.as_str(), &file.filename)
            .await
            .map_err(js_error)
    }
}

/// URL of the active tab in the current window, query string stripped
pub async fn active_tab_url() -> Result<String> {
    let url_js = getActiveTabUrl().await.map_err(js_error)?;
    Ok(sanitize_url(&url_js.as_string().unwrap_or_default()))
}

pub async fn read_file_text(file: &web_sys::File) -> Result<String> {
    let text = JsFuture::from(file.text()).await.map_err(js_error)?;
    Ok(text.as_string().unwrap_or_default())
}

pub fn notify(message: &str) {
    showNotification(message);
}

/// Notify "<success>" or "<action> failed: <error>"
pub fn notify_outcome<T>(action: &str, success: &str, result: &Result<T>) {
    match result {
        Ok(_) => notify(success),
        Err(e) => {
            log::warn!("{} failed: {:?}", action, e);
            notify(&failure_message(action, e));
        }
    }
}

pub fn open_options_page() {
    open_options_page_js();
}

/// `window.location.search` of the current page
pub fn location_search() -> String {
    web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default()
}

pub fn set_document_title(title: &str) {
    if let Some(document) = web_sys::window().and_then(|window| window.document()) {
        document.set_title(title);
    }
}
