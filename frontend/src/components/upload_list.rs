use leptos::*;

use crate::services::UploadTracker;
use crate::types::UploadId;

/// Container of status rows, one per upload attempt.
#[component]
pub fn UploadList(tracker: RwSignal<UploadTracker>) -> impl IntoView {
    view! {
        <div class="uploads" id="uploads">
            <For
                each=move || tracker.with(|t| t.ids())
                key=|id| *id
                children=move |upload_id| view! { <UploadRow upload_id=upload_id tracker=tracker/> }
            />
        </div>
    }
}

#[component]
fn UploadRow(upload_id: UploadId, tracker: RwSignal<UploadTracker>) -> impl IntoView {
    let details = move || {
        tracker.with(|t| t.get(upload_id).map(|r| r.status_text()).unwrap_or_default())
    };
    let bar_class = move || tracker.with(|t| t.get(upload_id).map_or("progress", |r| r.bar_class()));
    let bar_style = move || {
        let pct = tracker.with(|t| t.get(upload_id).map_or(0, |r| r.bar_percent));
        format!("width: {}%;", pct)
    };

    view! {
        <div class="info" id=upload_id.dom_id()>
            <div class="progress-track">
                <div class=bar_class style=bar_style></div>
            </div>
            <div class="details">{details}</div>
        </div>
    }
}
