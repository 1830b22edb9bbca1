//! UI Components

use leptos::prelude::*;

use crate::api::{self, FieldDto, PanelDto, PanelRequest};

/// Single input widget bound to a signal
#[component]
fn FieldInput(field: FieldDto, value: RwSignal<String>) -> impl IntoView {
    let label = field.label.clone();
    let input = match field.kind.as_str() {
        "select" => view! {
            <select
                prop:value=move || value.get()
                on:change=move |ev| value.set(event_target_value(&ev))
            >
                {field
                    .options
                    .into_iter()
                    .map(|opt| view! { <option value=opt.clone()>{opt.clone()}</option> })
                    .collect_view()}
            </select>
        }
        .into_any(),
        "text_input" => view! {
            <input
                type="text"
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        }
        .into_any(),
        _ => view! {
            <textarea
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        }
        .into_any(),
    };

    view! {
        <div class="field">
            <label>{label}</label>
            {input}
        </div>
    }
}

/// One desk tab: inputs, trigger button, inline message and output
#[component]
pub fn PanelView(panel: PanelDto, session: ReadSignal<Option<String>>) -> impl IntoView {
    let (output, set_output) = signal(String::new());
    let (notice, set_notice) = signal(Option::<String>::None);
    let (loading, set_loading) = signal(false);

    let values: Vec<(FieldDto, RwSignal<String>)> = panel
        .fields
        .iter()
        .map(|f| {
            let initial = f.options.first().cloned().unwrap_or_default();
            (f.clone(), RwSignal::new(initial))
        })
        .collect();

    let bindings: Vec<(String, RwSignal<String>)> = values
        .iter()
        .map(|(f, v)| (f.name.clone(), *v))
        .collect();
    let slug = panel.slug.clone();
    let button = panel.button.clone();
    let uses_dataset = panel.uses_dataset;

    let run = move |_| {
        if loading.get() {
            return;
        }

        let mut input = PanelRequest::default();
        for (name, value) in &bindings {
            input.set(name, value.get());
        }

        set_notice.set(None);
        set_loading.set(true);

        let slug = slug.clone();
        let session = session.get();
        leptos::task::spawn_local(async move {
            match api::run_panel(&slug, &input, session).await {
                Ok(text) => set_output.set(text),
                Err(message) => set_notice.set(Some(message)),
            }
            set_loading.set(false);
        });
    };

    view! {
        <section class="panel">
            <h2>{panel.heading.clone()}</h2>
            <Show when=move || uses_dataset>
                <p class="hint">"Runs on the first rows of the uploaded CSV."</p>
            </Show>

            {values
                .into_iter()
                .map(|(field, value)| view! { <FieldInput field=field value=value /> })
                .collect_view()}

            <button on:click=run disabled=move || loading.get()>
                {move || if loading.get() { "...".to_string() } else { button.clone() }}
            </button>

            <Show when=move || notice.get().is_some()>
                <p class="notice">{move || notice.get().unwrap_or_default()}</p>
            </Show>

            <div class="output">
                <label>{panel.output_label.clone()}</label>
                <textarea readonly=true prop:value=move || output.get() />
            </div>
        </section>
    }
}
