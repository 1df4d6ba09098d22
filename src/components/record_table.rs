//! Record Table Component
//!
//! Header from the record's field labels, one row per entry.

use leptos::prelude::*;
use remote_collection::{CollectionState, Record, Row};

#[component]
pub fn RecordTable<R: Record>(
    state: RwSignal<CollectionState<R>>,
    on_edit: Callback<String>,
    on_delete: Callback<String>,
) -> impl IntoView {
    let rows = move || state.with(|s| s.rows());
    let has_rows = move || state.with(|s| !s.is_empty());

    view! {
        <Show when=has_rows fallback=|| view! { <p class="empty">"No data available"</p> }>
            <table class="record-table">
                <thead>
                    <tr>
                        {R::FIELDS.iter().map(|spec| view! { <th>{spec.label}</th> }).collect_view()}
                        <th>"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=rows
                        // Whole row as key so edited cells re-render
                        key=|row| row.clone()
                        children=move |row| view! { <RecordRow row=row on_edit=on_edit on_delete=on_delete /> }
                    />
                </tbody>
            </table>
        </Show>
    }
}

/// A single record row
///
/// Unconfirmed rows have no server id yet, so their controls stay disabled.
#[component]
pub fn RecordRow(
    row: Row,
    on_edit: Callback<String>,
    on_delete: Callback<String>,
) -> impl IntoView {
    let locked = row.pending || row.id.is_none();
    let id = row.id.clone().unwrap_or_default();
    let edit_id = id.clone();
    let class = if row.pending { "record-row pending" } else { "record-row" };

    view! {
        <tr class=class>
            {row.cells.into_iter().map(|cell| view! { <td>{cell.value}</td> }).collect_view()}
            <td class="actions">
                <button disabled=locked on:click=move |_| on_edit.run(edit_id.clone())>"Update"</button>
                <button disabled=locked on:click=move |_| on_delete.run(id.clone())>"Delete"</button>
            </td>
        </tr>
    }
}
