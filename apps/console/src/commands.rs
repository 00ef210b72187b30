//! One function per subcommand. Each returns whether the action succeeded;
//! the slices already turned failures into notices.

use std::{
    collections::HashSet,
    io::{self, BufRead, Write},
    sync::Arc,
};

use anyhow::Context;
use client_core::{
    ActiveChoice, AdminApi, ConfirmPrompt, LoadState, Notice, NoticeLevel, PageSize,
    PositionForm, PositionsSlice, SubmitError, TeacherForm, TeachersSlice,
};
use shared::domain::{PositionId, TeacherId};
use tracing::warn;

use crate::render;

pub async fn list_positions(api: Arc<dyn AdminApi>, page: u32, search: String) -> bool {
    let mut slice = PositionsSlice::new(api);
    slice.reload().await;
    let clean = print_notices(slice.take_notices());
    if slice.state() == LoadState::Failed {
        return false;
    }

    slice.set_search(search);
    let (rows, pager) = slice.visible(page);
    println!("{}", render::positions_table(&rows, &pager));
    clean
}

pub async fn create_position(
    api: Arc<dyn AdminApi>,
    code: String,
    name: String,
    description: String,
    active: bool,
) -> bool {
    let mut slice = PositionsSlice::new(api);
    slice.open_create();
    *slice.form_mut() = PositionForm {
        code: code.clone(),
        name,
        description,
        status: Some(if active {
            ActiveChoice::Active
        } else {
            ActiveChoice::Inactive
        }),
    };

    let result = slice.submit_create().await;
    print_notices(slice.take_notices());
    match result {
        Ok(Some(created)) => {
            println!("created position id={} code={}", created.id, created.code);
            true
        }
        Ok(None) => {
            println!("created position code={}", code.trim());
            true
        }
        Err(err) => {
            print_field_errors(&err);
            false
        }
    }
}

pub async fn delete_position(
    api: Arc<dyn AdminApi>,
    id: PositionId,
    assume_yes: bool,
) -> anyhow::Result<bool> {
    let mut slice = PositionsSlice::new(api);
    // Loaded first so the prompt can name the row.
    slice.reload().await;
    print_notices(slice.take_notices());

    let prompt = slice.request_delete(&id);
    let confirmed = assume_yes || confirm(&prompt)?;
    let outcome = slice.resolve_delete(prompt, confirmed).await;
    let clean = print_notices(slice.take_notices());

    Ok(match outcome {
        Ok(true) => {
            let (rows, pager) = slice.visible(1);
            println!("{}", render::positions_table(&rows, &pager));
            clean
        }
        Ok(false) => {
            eprintln!("cancelled");
            true
        }
        Err(_) => false,
    })
}

pub async fn list_teachers(
    api: Arc<dyn AdminApi>,
    page: u32,
    page_size: PageSize,
    search: String,
) -> bool {
    let mut slice = TeachersSlice::with_page_size(api, page_size);
    slice.fetch(page, page_size, search).await;
    let clean = print_notices(slice.take_notices());
    if slice.state() == LoadState::Failed {
        return false;
    }

    println!("{}", render::teachers_table(slice.rows(), &slice.pager()));
    clean
}

pub async fn create_teacher(api: Arc<dyn AdminApi>, page_size: PageSize, form: TeacherForm) -> bool {
    let mut slice = TeachersSlice::with_page_size(api, page_size);
    slice.open_create().await;
    if slice.options_state() == LoadState::Loaded {
        let known: HashSet<&PositionId> = slice
            .position_options()
            .iter()
            .map(|option| &option.value)
            .collect();
        for id in form.position_ids.iter().filter(|id| !known.contains(id)) {
            warn!("console: position id={id} is not among the loaded options");
        }
    }
    let email = form.email.trim().to_string();
    *slice.form_mut() = form;

    let result = slice.submit_create().await;
    let clean = print_notices(slice.take_notices());
    match result {
        Ok(created) => {
            match created {
                Some(created) => println!(
                    "created teacher id={} username={}",
                    created.id,
                    created.display_name()
                ),
                None => println!("created teacher email={email}"),
            }
            if slice.state() == LoadState::Loaded {
                println!("{}", render::teachers_table(slice.rows(), &slice.pager()));
            }
            clean
        }
        Err(err) => {
            print_field_errors(&err);
            false
        }
    }
}

pub async fn delete_teacher(
    api: Arc<dyn AdminApi>,
    id: TeacherId,
    page: u32,
    page_size: PageSize,
    search: String,
    assume_yes: bool,
) -> anyhow::Result<bool> {
    let mut slice = TeachersSlice::with_page_size(api, page_size);
    slice.fetch(page, page_size, search).await;
    print_notices(slice.take_notices());

    let prompt = slice.request_delete(&id);
    let confirmed = assume_yes || confirm(&prompt)?;
    let outcome = slice.resolve_delete(prompt, confirmed).await;
    let clean = print_notices(slice.take_notices());

    Ok(match outcome {
        Ok(true) => {
            if slice.state() == LoadState::Loaded {
                println!("{}", render::teachers_table(slice.rows(), &slice.pager()));
            }
            clean
        }
        Ok(false) => {
            eprintln!("cancelled");
            true
        }
        Err(_) => false,
    })
}

pub async fn position_options(api: Arc<dyn AdminApi>, filter: &str) -> bool {
    let mut slice = TeachersSlice::new(api);
    slice.load_position_options().await;
    let clean = print_notices(slice.take_notices());
    if slice.options_state() == LoadState::Failed {
        return false;
    }

    println!("{}", render::options_list(&slice.filter_position_options(filter)));
    clean
}

/// Returns `false` if any of the notices was an error.
fn print_notices(notices: Vec<Notice>) -> bool {
    let mut clean = true;
    for notice in notices {
        match notice.level {
            NoticeLevel::Success => eprintln!("ok: {notice}"),
            NoticeLevel::Error => {
                clean = false;
                eprintln!("error: {notice}");
            }
        }
    }
    clean
}

fn print_field_errors(err: &SubmitError) {
    if let Some(errors) = err.validation() {
        eprintln!("error: the form has invalid fields");
        for field in errors.fields() {
            eprintln!("  {}: {}", field.field, field.message);
        }
    }
}

fn confirm<I>(prompt: &ConfirmPrompt<I>) -> anyhow::Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "{}: {} [y/N] ", prompt.title, prompt.message)?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
