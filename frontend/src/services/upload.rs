//! HTTP upload of a single file with progress events.
//!
//! Uses `XMLHttpRequest` rather than `fetch` because only the former
//! reports upload progress.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, File, FileList, FormData, ProgressEvent, XmlHttpRequest};

use crate::config::{FILE_FIELD, FILE_NAME_HEADER, SEND_ENDPOINT};
use crate::types::{AppError, AppResult, ProgressSample, UploadEvent};

/// Collect the files of a (possibly missing) `FileList`.
pub fn files_from_list(list: Option<FileList>) -> Vec<File> {
    match list {
        Some(list) => (0..list.length()).filter_map(|i| list.get(i)).collect(),
        None => Vec::new(),
    }
}

fn upload_err(context: &str) -> impl Fn(JsValue) -> AppError + '_ {
    move |e| AppError::Upload(format!("{}: {:?}", context, e))
}

/// POST `file` to the send endpoint as multipart form data.
///
/// Returns once the request is sent; everything afterwards arrives through
/// `on_event`, ending in exactly one `Loaded` or `TransportError`.
pub fn send_file(file: &File, on_event: Rc<dyn Fn(UploadEvent)>) -> AppResult<()> {
    let name = file.name();

    let form = FormData::new().map_err(upload_err("Failed to create FormData"))?;
    form.set_with_blob_and_filename(FILE_FIELD, file, &name)
        .map_err(upload_err("Failed to append file"))?;

    let xhr = XmlHttpRequest::new().map_err(upload_err("Failed to create request"))?;
    let upload = xhr.upload().map_err(upload_err("No upload target"))?;

    // Progress
    let cb = on_event.clone();
    let onprogress = Closure::wrap(Box::new(move |e: ProgressEvent| {
        cb(UploadEvent::Progress(ProgressSample {
            loaded: e.loaded(),
            total: e.total(),
            length_computable: e.length_computable(),
        }));
    }) as Box<dyn FnMut(ProgressEvent)>);
    upload.set_onprogress(Some(onprogress.as_ref().unchecked_ref()));
    onprogress.forget();

    // Completion, whatever the status code
    let cb = on_event.clone();
    let done = xhr.clone();
    let onload = Closure::wrap(Box::new(move |_: Event| {
        let status = done.status().unwrap_or(0);
        let body = done.response_text().ok().flatten().unwrap_or_default();
        cb(UploadEvent::Loaded { status, body });
    }) as Box<dyn FnMut(Event)>);
    xhr.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();

    // Network failure and abort
    let cb = on_event;
    let onerror = Closure::wrap(Box::new(move |_: Event| {
        cb(UploadEvent::TransportError);
    }) as Box<dyn FnMut(Event)>);
    xhr.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    xhr.set_onabort(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    xhr.open_with_async("POST", SEND_ENDPOINT, true)
        .map_err(upload_err("Failed to open request"))?;

    // Header values must be ASCII; the multipart filename covers the rest.
    if name.is_ascii() {
        xhr.set_request_header(FILE_NAME_HEADER, &name)
            .map_err(upload_err("Failed to set header"))?;
    }

    xhr.send_with_opt_form_data(Some(&form))
        .map_err(upload_err("Failed to send request"))?;

    Ok(())
}
