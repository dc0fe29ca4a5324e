use crate::backup::{export_all, export_file_name, import_all, import_message};
use crate::counter::DailyCounter;
use crate::errors::AppError;
use crate::history::build_history;
use crate::models::{
    CounterAction, CounterRequest, DailyRecord, HistoryResponse, ImportResponse, TodayResponse,
};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
    Json,
};
use tracing::info;

const MAX_BATCH: u32 = 100;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    state
        .with_store(|store, clock| {
            let today = DailyCounter::open(&mut *store, clock)?.record();
            let history = build_history(&*store);
            Ok(Html(render_index(&today, &history)))
        })
        .await
}

pub async fn get_today(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    state
        .with_store(|store, clock| {
            let counter = DailyCounter::open(&mut *store, clock)?;
            Ok(Json(to_response(counter.record())))
        })
        .await
}

pub async fn update_counter(
    State(state): State<AppState>,
    payload: Result<Json<CounterRequest>, JsonRejection>,
) -> Result<Json<TodayResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    if payload.amount == 0 || payload.amount > MAX_BATCH {
        return Err(AppError::bad_request(format!(
            "amount must be between 1 and {MAX_BATCH}"
        )));
    }
    if matches!(payload.action, CounterAction::Decrement) && payload.amount != 1 {
        return Err(AppError::bad_request("decrement only moves by 1"));
    }

    state
        .with_store(move |store, clock| {
            let mut counter = DailyCounter::open(&mut *store, clock)?;
            match payload.action {
                CounterAction::Increment => counter.batch_increment(payload.amount)?,
                CounterAction::Decrement => counter.decrement()?,
            };
            Ok(Json(to_response(counter.record())))
        })
        .await
}

pub async fn increment_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    state
        .with_store(|store, clock| {
            DailyCounter::open(&mut *store, clock)?.increment()?;
            Ok(Redirect::to("/"))
        })
        .await
}

pub async fn decrement_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    state
        .with_store(|store, clock| {
            DailyCounter::open(&mut *store, clock)?.decrement()?;
            Ok(Redirect::to("/"))
        })
        .await
}

pub async fn get_history(State(state): State<AppState>) -> Result<Json<HistoryResponse>, AppError> {
    state
        .with_store(|store, _| Ok(Json(build_history(&*store))))
        .await
}

pub async fn export_backup(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let document = state.with_store(|store, clock| Ok(export_all(&*store, clock))).await?;
    let filename = export_file_name(state.clock.as_ref());
    info!(
        history = document.history_entries.len(),
        %filename,
        "exporting backup"
    );

    Ok((
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )],
        Json(document),
    ))
}

pub async fn import_backup(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImportResponse>, AppError> {
    state
        .with_store(move |store, _| {
            let imported = import_all(&mut *store, &body)?;
            Ok(Json(ImportResponse {
                imported,
                message: import_message(imported),
            }))
        })
        .await
}

fn to_response(record: DailyRecord) -> TodayResponse {
    TodayResponse {
        date: record.date,
        count: record.count,
    }
}
