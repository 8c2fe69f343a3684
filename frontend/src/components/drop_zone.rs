//! Drop surface and file picker.
//!
//! Files arrive either from a drop gesture or from the `<input type="file">`
//! change event; both paths end in [`handle_files`].
//!
//! Drag and drop listeners sit on the window, so the whole page is the drop
//! surface and the browser never opens a file dropped beside the box.

use std::rc::Rc;

use leptos::*;
use web_sys::{DragEvent, Event, File, HtmlInputElement};

use crate::services::{files_from_list, send_file, UploadTracker};
use crate::types::{UploadEvent, UploadId};

/// Drag events that toggle the `dragover` highlight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragEventKind {
    Enter,
    Over,
    Leave,
    End,
    Drop,
}

impl DragEventKind {
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "dragenter" => Some(Self::Enter),
            "dragover" => Some(Self::Over),
            "dragleave" => Some(Self::Leave),
            "dragend" => Some(Self::End),
            "drop" => Some(Self::Drop),
            _ => None,
        }
    }

    /// Highlight state right after this event.
    pub fn activates(self) -> bool {
        matches!(self, Self::Enter | Self::Over)
    }
}

#[component]
pub fn DropZone(tracker: RwSignal<UploadTracker>) -> impl IntoView {
    let (drag_active, set_drag_active) = create_signal(false);
    let (uploading, set_uploading) = create_signal(false);

    // Keeps the browser from opening the dropped file
    let on_drag = move |ev: DragEvent| {
        ev.prevent_default();
        if let Some(kind) = DragEventKind::from_event_type(&ev.type_()) {
            set_drag_active.set(kind.activates());
        }
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_drag_active.set(DragEventKind::Drop.activates());
        let files = files_from_list(ev.data_transfer().and_then(|dt| dt.files()));
        handle_files(files, tracker, set_uploading);
    };

    let listeners = [
        window_event_listener(ev::dragenter, on_drag),
        window_event_listener(ev::dragover, on_drag),
        window_event_listener(ev::dragleave, on_drag),
        window_event_listener(ev::dragend, on_drag),
        window_event_listener(ev::drop, on_drop),
    ];
    on_cleanup(move || {
        for listener in listeners {
            listener.remove();
        }
    });

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        let files = files_from_list(input.files());
        // Picking the same file again must fire `change` again
        input.set_value("");
        handle_files(files, tracker, set_uploading);
    };

    view! {
        <div
            class="dropzone"
            class:dragover=move || drag_active.get()
            class:uploading=move || uploading.get()
        >
            <div class="dropzone-icon">"📤"</div>
            <div class="dropzone-text">"Drop files anywhere on the page"</div>
            <form id="form" on:submit=|ev| ev.prevent_default()>
                <input
                    type="file"
                    id="fileInput"
                    multiple=true
                    style="display:none"
                    on:change=on_file_change
                />
                <label for="fileInput" class="upload-button">
                    "or choose files"
                </label>
            </form>
        </div>
    }
}

/// Start one independent upload per file.
fn handle_files(files: Vec<File>, tracker: RwSignal<UploadTracker>, set_uploading: WriteSignal<bool>) {
    let Some(ids) = tracker
        .try_update(|t| t.begin_batch(files.iter().map(File::name)))
        .flatten()
    else {
        return;
    };
    set_uploading.set(true);

    log::info!("📤 Uploading {} file(s)", ids.len());

    for (file, id) in files.iter().zip(ids) {
        submit_file(file, id, tracker);
    }
}

fn submit_file(file: &File, id: UploadId, tracker: RwSignal<UploadTracker>) {
    let name = file.name();
    let on_event: Rc<dyn Fn(UploadEvent)> = Rc::new(move |event: UploadEvent| {
        match &event {
            UploadEvent::Loaded { status, body } => {
                log::info!("Status: {} {}", status, body);
            }
            UploadEvent::TransportError => {
                log::error!("❌ Upload {} of {} failed", id, name);
            }
            UploadEvent::Progress(_) => {}
        }
        tracker.update(|t| {
            t.apply(id, &event);
        });
    });

    tracker.update(|t| {
        t.mark_submitted(id);
    });

    let sent = send_file(file, on_event);
    if let Err(e) = &sent {
        log::error!("❌ Upload {} of {} failed: {}", id, file.name(), e);
    }
    tracker.update(|t| {
        t.finish_submission(id, &sent);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hover_events_activate() {
        for name in ["dragenter", "dragover"] {
            let kind = DragEventKind::from_event_type(name).unwrap();
            assert!(kind.activates(), "{} should activate", name);
        }
    }

    #[test]
    fn test_leave_end_drop_deactivate() {
        for name in ["dragleave", "dragend", "drop"] {
            let kind = DragEventKind::from_event_type(name).unwrap();
            assert!(!kind.activates(), "{} should deactivate", name);
        }
    }

    #[test]
    fn test_unrelated_events_are_ignored() {
        assert_eq!(DragEventKind::from_event_type("click"), None);
        assert_eq!(DragEventKind::from_event_type("dragstart"), None);
    }
}
