//! Profile page for the signed-in user.

use leptos::prelude::*;

use crate::state::profile::{ProfileState, ProfileStore};

#[component]
pub fn ProfilePage() -> impl IntoView {
    let store = expect_context::<ProfileStore>();
    let state = expect_context::<RwSignal<ProfileState>>();

    Effect::new(move || {
        let store = store.clone();
        leptos::task::spawn_local(async move {
            store.fetch_profile().await;
        });
    });

    view! {
        <section class="profile-page">
            <h1>"Profile"</h1>
            <Show when=move || state.get().is_loading>
                <p>"Loading..."</p>
            </Show>
            <Show when=move || state.get().error.is_some()>
                <p class="profile-page__error">{move || state.get().error.unwrap_or_default()}</p>
            </Show>
            {move || {
                state
                    .get()
                    .profile
                    .map(|p| {
                        let shown = p.nickname.clone().unwrap_or_else(|| p.username.clone());
                        view! {
                            <dl class="profile-page__fields">
                                <dt>"Name"</dt>
                                <dd>{shown}</dd>
                                <dt>"Username"</dt>
                                <dd>{p.username}</dd>
                                <dt>"Email"</dt>
                                <dd>{p.email}</dd>
                                <dt>"Bio"</dt>
                                <dd>{p.bio.unwrap_or_else(|| "-".to_owned())}</dd>
                            </dl>
                        }
                    })
            }}
        </section>
    }
}
