//! taskflow session: a JSON-lines front end over one live board.
//!
//! Each stdin line is one request, tagged by `op`. Each request gets exactly
//! one stdout line back, `{"status":"ok",...}` or `{"status":"error",...}`.
//! A failing request does not end the session.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::board::Board;
use crate::category::NewCategory;
use crate::clock::SystemClock;
use crate::config::Config;
use crate::error::{Error, JsonError, Result};
use crate::task::{NewTask, TaskPatch};
use crate::view::{parse_due_date, CategoryFilter, SortMode};

pub struct SessionOptions {
    pub config: Config,
    pub seed: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    View {
        #[serde(default)]
        now: Option<String>,
    },
    Reload,
    GetTask {
        id: String,
    },
    AddTask {
        task: NewTask,
    },
    Toggle {
        id: String,
    },
    EditTask {
        id: String,
        patch: TaskPatch,
    },
    DeleteTask {
        id: String,
    },
    AddCategory {
        name: String,
    },
    RenameCategory {
        id: String,
        name: String,
    },
    DeleteCategory {
        id: String,
    },
    SetFilter {
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        search: Option<String>,
        #[serde(default)]
        sort: Option<SortMode>,
    },
}

impl Request {
    fn op(&self) -> &'static str {
        match self {
            Request::View { .. } => "view",
            Request::Reload => "reload",
            Request::GetTask { .. } => "get_task",
            Request::AddTask { .. } => "add_task",
            Request::Toggle { .. } => "toggle",
            Request::EditTask { .. } => "edit_task",
            Request::DeleteTask { .. } => "delete_task",
            Request::AddCategory { .. } => "add_category",
            Request::RenameCategory { .. } => "rename_category",
            Request::DeleteCategory { .. } => "delete_category",
            Request::SetFilter { .. } => "set_filter",
        }
    }
}

#[derive(Debug, Serialize)]
struct Reply {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    op: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
}

impl Reply {
    fn ok(op: &'static str, data: Value) -> Self {
        Self {
            status: "ok",
            op: Some(op),
            data: Some(data),
            error: None,
        }
    }

    fn error(op: Option<&'static str>, err: &Error) -> Self {
        Self {
            status: "error",
            op,
            data: None,
            error: Some(JsonError::from(err)),
        }
    }
}

pub async fn run(options: SessionOptions) -> Result<()> {
    let seed = super::load_seed(options.seed.as_deref(), Utc::now())?;
    let mut board = Board::from_config(&options.config, seed, Arc::new(SystemClock))?;
    board.load().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<Request>(line) {
            Ok(request) => {
                let op = request.op();
                debug!(op, "session request");
                match handle(&mut board, request).await {
                    Ok(data) => Reply::ok(op, data),
                    Err(err) => Reply::error(Some(op), &err),
                }
            }
            Err(err) => Reply::error(None, &Error::InvalidArgument(format!("bad request: {err}"))),
        };

        let mut encoded = serde_json::to_vec(&reply)?;
        encoded.push(b'\n');
        stdout.write_all(&encoded).await?;
        stdout.flush().await?;
    }

    Ok(())
}

pub async fn handle(board: &mut Board, request: Request) -> Result<Value> {
    let data = match request {
        Request::View { now } => {
            let now = match now.as_deref() {
                Some(raw) => parse_due_date(raw)?,
                None => Utc::now(),
            };
            serde_json::to_value(board.view(now))?
        }
        Request::Reload => {
            board.load().await?;
            json!({
                "tasks": board.tasks().len(),
                "categories": board.categories().len(),
            })
        }
        Request::GetTask { id } => serde_json::to_value(board.get_task(&id).await?)?,
        Request::AddTask { task } => serde_json::to_value(board.add_task(task).await?)?,
        Request::Toggle { id } => serde_json::to_value(board.toggle_complete(&id).await?)?,
        Request::EditTask { id, patch } => {
            serde_json::to_value(board.edit_task(&id, patch).await?)?
        }
        Request::DeleteTask { id } => {
            board.delete_task(&id).await?;
            json!({ "id": id, "deleted": true })
        }
        Request::AddCategory { name } => {
            serde_json::to_value(board.add_category(NewCategory::new(name)).await?)?
        }
        Request::RenameCategory { id, name } => {
            serde_json::to_value(board.rename_category(&id, name).await?)?
        }
        Request::DeleteCategory { id } => {
            board.remove_category(&id).await?;
            json!({ "id": id, "deleted": true })
        }
        Request::SetFilter {
            category,
            search,
            sort,
        } => {
            if let Some(category) = category {
                board.set_category(CategoryFilter::from(category));
            }
            if let Some(search) = search {
                board.set_search(search);
            }
            if let Some(sort) = sort {
                board.set_sort(sort);
            }
            serde_json::to_value(board.state())?
        }
    };
    Ok(data)
}
