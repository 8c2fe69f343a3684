//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"DropSend"</h1>
            <p class="subtitle">
                "Drag files onto the box below or pick them by hand. "
                "Each file uploads on its own and shows its progress."
            </p>
        </div>
    }
}
