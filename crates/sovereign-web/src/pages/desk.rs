//! Desk Page

use leptos::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::api::{self, PanelDto};
use crate::components::PanelView;

#[component]
pub fn DeskPage() -> impl IntoView {
    let (panels, set_panels) = signal(Vec::<PanelDto>::new());
    let (active, set_active) = signal(0usize);
    let (session, set_session) = signal(Option::<String>::None);
    let (upload_status, set_upload_status) = signal(Option::<String>::None);

    leptos::task::spawn_local(async move {
        match api::fetch_panels().await {
            Ok(list) => set_panels.set(list),
            Err(e) => set_upload_status.set(Some(format!("Could not load panels: {e}"))),
        }
    });

    let on_file = move |ev: leptos::ev::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        let Some(file) = input.files().and_then(|list| list.get(0)) else {
            return;
        };
        let promise = file.text();

        leptos::task::spawn_local(async move {
            let csv = match JsFuture::from(promise).await {
                Ok(value) => value.as_string().unwrap_or_default(),
                Err(_) => {
                    set_upload_status.set(Some("Could not read file.".into()));
                    return;
                }
            };

            match api::upload_csv(csv, session.get_untracked()).await {
                Ok(upload) => {
                    set_session.set(Some(upload.session_id));
                    set_upload_status.set(Some(format!(
                        "{} ({} rows: {})",
                        upload.message,
                        upload.rows,
                        upload.columns.join(", ")
                    )));
                }
                Err(e) => set_upload_status.set(Some(e)),
            }
        });
    };

    view! {
        <div class="desk">
            <header class="hero">
                <h1>"Sovereign AI – Autonomous CFO Copilot for Fund Ops"</h1>
                <p class="tagline">
                    "Automate compliance, treasury, LP relations, filings, and analytics."
                </p>
            </header>

            <section class="uploader">
                <label>"Upload fund data (CSV)"</label>
                <input type="file" accept=".csv,text/csv" on:change=on_file />
                <Show when=move || upload_status.get().is_some()>
                    <p class="status">{move || upload_status.get().unwrap_or_default()}</p>
                </Show>
            </section>

            <nav class="tabs">
                {move || {
                    panels
                        .get()
                        .into_iter()
                        .enumerate()
                        .map(|(idx, panel)| {
                            view! {
                                <button
                                    class="tab"
                                    class:active=move || active.get() == idx
                                    on:click=move |_| set_active.set(idx)
                                >
                                    {panel.title}
                                </button>
                            }
                        })
                        .collect_view()
                }}
            </nav>

            {move || {
                panels
                    .get()
                    .into_iter()
                    .enumerate()
                    .map(|(idx, panel)| {
                        view! {
                            <div class="tab-body" class:hidden=move || active.get() != idx>
                                <PanelView panel=panel session=session />
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
