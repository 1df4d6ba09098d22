//! Create Form Component
//!
//! Edits the collection's draft; one text input per draft field.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use remote_collection::{CollectionState, Fields, Record};

#[component]
pub fn CreateForm<R: Record>(
    state: RwSignal<CollectionState<R>>,
    /// Validation message from the last submit
    error: ReadSignal<Option<String>>,
    #[prop(into)] on_submit: Callback<()>,
) -> impl IntoView {
    let fields = <R::Draft as Fields>::FIELDS;

    view! {
        <div class="create-form">
            <h2>{format!("Add {}", R::LABEL)}</h2>
            <form on:submit=move |ev: SubmitEvent| {
                ev.prevent_default();
                on_submit.run(());
            }>
                {fields.iter().map(|spec| {
                    let name = spec.name;
                    view! {
                        <label>{spec.label} ":"</label>
                        <input
                            type="text"
                            name=name
                            prop:value=move || state.with(|s| s.draft().field(name).unwrap_or_default().to_string())
                            on:input=move |ev| {
                                state.update(|s| {
                                    s.set_draft_field(name, event_target_value(&ev));
                                });
                            }
                        />
                        <br />
                    }
                }).collect_view()}
                {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
                <button type="submit">"Save"</button>
            </form>
        </div>
    }
}
