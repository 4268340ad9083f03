//! Renders the notification toasts pushed by [`crate::util::notify::ToastNotifier`].

use leptos::prelude::*;

use crate::state::ui::UiState;

#[component]
pub fn ToastStack() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    let toasts = move || ui.with(UiState::visible);

    view! {
        <div class="toast-stack" role="status">
            <For
                each=toasts
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let class = format!("toast toast--{}", toast.notification.level.class_suffix());
                    view! {
                        <div class=class>
                            <strong class="toast__title">{toast.notification.title}</strong>
                            <p class="toast__message">{toast.notification.message}</p>
                            <button
                                class="toast__dismiss"
                                on:click=move |_| ui.update(|u| u.dismiss(id))
                            >
                                "Dismiss"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
