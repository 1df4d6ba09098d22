//! Edit Modal Component
//!
//! Edits a staged copy of one record. Save hands the copy to the update
//! transition; Cancel drops it without touching the list.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use remote_collection::{CollectionState, Fields, Record};

#[component]
pub fn EditModal<R: Record>(
    state: RwSignal<CollectionState<R>>,
    #[prop(into)] on_save: Callback<()>,
) -> impl IntoView {
    let is_open = move || state.with(|s| s.edit_target().is_some());

    view! {
        <Show when=is_open>
            <div class="modal">
                <h2>{format!("Update {}", R::LABEL)}</h2>
                <form on:submit=move |ev: SubmitEvent| {
                    ev.prevent_default();
                    on_save.run(());
                }>
                    {R::FIELDS.iter().map(|spec| {
                        let name = spec.name;
                        view! {
                            <label>{spec.label} ":"</label>
                            <input
                                type="text"
                                name=name
                                prop:value=move || state.with(|s| {
                                    s.edit_target()
                                        .and_then(|r| r.field(name))
                                        .unwrap_or_default()
                                        .to_string()
                                })
                                on:input=move |ev| {
                                    state.update(|s| {
                                        s.set_edit_field(name, event_target_value(&ev));
                                    });
                                }
                            />
                            <br />
                        }
                    }).collect_view()}
                    <button type="submit">"Update"</button>
                    <button type="button" on:click=move |_| state.update(|s| s.cancel_edit())>
                        "Cancel"
                    </button>
                </form>
            </div>
        </Show>
    }
}
