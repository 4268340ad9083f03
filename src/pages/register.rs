//! Registration page. A successful sign-up signs the user in.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::net::types::RegisterPayload;
use crate::state::session::{SessionState, SessionStore};
use crate::util::auth::LOGIN_PATH;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let session = expect_context::<SessionStore>();
    let state = expect_context::<RwSignal<SessionState>>();
    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let mismatch = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if state.get_untracked().is_loading {
            return;
        }
        if password.get_untracked() != confirm.get_untracked() {
            mismatch.set(true);
            return;
        }
        mismatch.set(false);
        let payload = RegisterPayload {
            username: username.get_untracked().trim().to_owned(),
            email: email.get_untracked().trim().to_owned(),
            password: password.get_untracked(),
        };
        let session = session.clone();
        leptos::task::spawn_local(async move {
            session.register(&payload).await;
        });
    };

    let text_input = move |kind: &'static str, placeholder: &'static str, value: RwSignal<String>| {
        view! {
            <input
                class="auth-input"
                type=kind
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Create account"</h1>
                <form class="auth-form" on:submit=on_submit>
                    {text_input("text", "Username", username)}
                    {text_input("email", "Email", email)}
                    {text_input("password", "Password (6+ characters)", password)}
                    {text_input("password", "Confirm password", confirm)}
                    <button class="auth-button" type="submit" disabled=move || state.get().is_loading>
                        "Sign up"
                    </button>
                </form>
                <Show when=move || mismatch.get()>
                    <p class="auth-message auth-message--error">"Passwords do not match."</p>
                </Show>
                <Show when=move || !mismatch.get() && state.get().last_error.is_some()>
                    <p class="auth-message auth-message--error">
                        {move || state.get().last_error.unwrap_or_default()}
                    </p>
                </Show>
                <p class="auth-card__footer">
                    "Already registered? "
                    <A href=LOGIN_PATH>"Sign in"</A>
                </p>
            </div>
        </div>
    }
}
