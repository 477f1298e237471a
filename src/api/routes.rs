use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::models::{
    AppendMessageRequest, CreateChatRequest, CreatePromptRequest, CreateRoleRequest,
    CreateRuleRequest, PaginationQuery, UpdatePromptRequest, UpdateRoleRequest, UpdateRuleRequest,
};
use crate::store::chats::{ChatStore, UNTITLED};
use crate::store::library::{PromptStore, RoleStore, RuleStore};
use crate::store::models::UserProfile;
use crate::store::profile::ProfileStore;
use crate::store::{StorePool, WriteOutcome};

// --- Chats ---

#[post("")]
pub async fn create_chat(
    pool: web::Data<StorePool>,
    req: web::Json<CreateChatRequest>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();
    let title = req.into_inner().title.unwrap_or_else(|| UNTITLED.to_string());

    let chat = ChatStore::insert_chat(&conn, &title)?;
    Ok(HttpResponse::Created().json(chat))
}

#[get("")]
pub async fn list_chats(
    pool: web::Data<StorePool>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();

    let chats = ChatStore::list_chats(&conn, query.limit, query.offset)?;
    Ok(HttpResponse::Ok().json(chats))
}

#[get("/{id}")]
pub async fn get_chat(
    pool: web::Data<StorePool>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();

    match ChatStore::get_chat(&conn, id.into_inner())? {
        Some(chat) => Ok(HttpResponse::Ok().json(chat)),
        None => Err(ApiError::not_found("Chat not found")),
    }
}

#[delete("/{id}")]
pub async fn delete_chat(
    pool: web::Data<StorePool>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();
    let id = id.into_inner();

    if ChatStore::get_chat(&conn, id)?.is_none() {
        return Err(ApiError::not_found("Chat not found"));
    }

    ChatStore::delete_chat(&conn, id)?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/{id}/messages")]
pub async fn append_message(
    pool: web::Data<StorePool>,
    id: web::Path<Uuid>,
    req: web::Json<AppendMessageRequest>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();
    let id = id.into_inner();
    let req = req.into_inner();

    if ChatStore::get_chat(&conn, id)?.is_none() {
        return Err(ApiError::not_found("Chat not found"));
    }

    let message = ChatStore::append_message(&conn, id, req.role, &req.content)?;
    Ok(HttpResponse::Created().json(message))
}

#[get("/{id}/messages")]
pub async fn get_messages(
    pool: web::Data<StorePool>,
    id: web::Path<Uuid>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();
    let id = id.into_inner();

    if ChatStore::get_chat(&conn, id)?.is_none() {
        return Err(ApiError::not_found("Chat not found"));
    }

    let messages = ChatStore::get_messages(&conn, id, query.limit, query.offset)?;
    Ok(HttpResponse::Ok().json(messages))
}

#[get("/{id}/export")]
pub async fn export_chat(
    pool: web::Data<StorePool>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();
    let id = id.into_inner();

    let chat = match ChatStore::get_chat(&conn, id)? {
        Some(c) => c,
        None => return Err(ApiError::not_found("Chat not found")),
    };

    let transcript = ChatStore::export_transcript(&conn, &chat)?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"chat_{}.txt\"", id),
        ))
        .body(transcript))
}

// --- Prompts ---

#[post("")]
pub async fn create_prompt(
    pool: web::Data<StorePool>,
    req: web::Json<CreatePromptRequest>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();
    let req = req.into_inner();

    let prompt = PromptStore::insert(
        &conn,
        &req.title,
        &req.description,
        &req.content,
        req.category,
        &req.rule_ids,
    )?;
    Ok(HttpResponse::Created().json(prompt))
}

#[get("")]
pub async fn list_prompts(pool: web::Data<StorePool>) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();

    let prompts = PromptStore::list(&conn)?;
    Ok(HttpResponse::Ok().json(prompts))
}

/// User-created prompts only; built-ins never leave the server this way.
#[get("/export")]
pub async fn export_prompts(pool: web::Data<StorePool>) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();

    let prompts = PromptStore::export(&conn)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "exportDate": Utc::now().to_rfc3339(),
        "prompts": prompts,
    })))
}

#[get("/{id}")]
pub async fn get_prompt(
    pool: web::Data<StorePool>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();

    match PromptStore::get(&conn, &id)? {
        Some(prompt) => Ok(HttpResponse::Ok().json(prompt)),
        None => Err(ApiError::not_found(format!("No prompt found with id {}", id))),
    }
}

#[put("/{id}")]
pub async fn update_prompt(
    pool: web::Data<StorePool>,
    id: web::Path<String>,
    req: web::Json<UpdatePromptRequest>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();
    let id = id.into_inner();
    let req = req.into_inner();

    let outcome = PromptStore::update(
        &conn,
        &id,
        req.title.as_deref(),
        req.description.as_deref(),
        req.content.as_deref(),
        req.category,
        req.rule_ids.as_deref(),
    )?;

    match outcome {
        WriteOutcome::Applied => match PromptStore::get(&conn, &id)? {
            Some(prompt) => Ok(HttpResponse::Ok().json(prompt)),
            None => Err(ApiError::not_found(format!("No prompt found with id {}", id))),
        },
        WriteOutcome::Protected => {
            Err(ApiError::forbidden("Default prompts cannot be modified"))
        }
        WriteOutcome::NotFound => {
            Err(ApiError::not_found(format!("No prompt found with id {}", id)))
        }
    }
}

#[delete("/{id}")]
pub async fn delete_prompt(
    pool: web::Data<StorePool>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();
    let id = id.into_inner();

    match PromptStore::delete(&conn, &id)? {
        WriteOutcome::Applied => Ok(HttpResponse::NoContent().finish()),
        WriteOutcome::Protected => {
            Err(ApiError::forbidden("Default prompts cannot be deleted"))
        }
        WriteOutcome::NotFound => {
            Err(ApiError::not_found(format!("No prompt found with id {}", id)))
        }
    }
}

// --- Rules ---

#[post("")]
pub async fn create_rule(
    pool: web::Data<StorePool>,
    req: web::Json<CreateRuleRequest>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();
    let req = req.into_inner();

    let rule = RuleStore::insert(&conn, &req.name, &req.description, &req.content)?;
    Ok(HttpResponse::Created().json(rule))
}

#[get("")]
pub async fn list_rules(pool: web::Data<StorePool>) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();

    let rules = RuleStore::list(&conn)?;
    Ok(HttpResponse::Ok().json(rules))
}

#[get("/{id}")]
pub async fn get_rule(
    pool: web::Data<StorePool>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();

    match RuleStore::get(&conn, &id)? {
        Some(rule) => Ok(HttpResponse::Ok().json(rule)),
        None => Err(ApiError::not_found(format!("No rule found with id {}", id))),
    }
}

#[put("/{id}")]
pub async fn update_rule(
    pool: web::Data<StorePool>,
    id: web::Path<String>,
    req: web::Json<UpdateRuleRequest>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();
    let id = id.into_inner();
    let req = req.into_inner();

    let outcome = RuleStore::update(
        &conn,
        &id,
        req.name.as_deref(),
        req.description.as_deref(),
        req.content.as_deref(),
    )?;

    match outcome {
        WriteOutcome::Applied => match RuleStore::get(&conn, &id)? {
            Some(rule) => Ok(HttpResponse::Ok().json(rule)),
            None => Err(ApiError::not_found(format!("No rule found with id {}", id))),
        },
        WriteOutcome::Protected => Err(ApiError::forbidden("Default rules cannot be modified")),
        WriteOutcome::NotFound => {
            Err(ApiError::not_found(format!("No rule found with id {}", id)))
        }
    }
}

#[delete("/{id}")]
pub async fn delete_rule(
    pool: web::Data<StorePool>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();
    let id = id.into_inner();

    match RuleStore::delete(&conn, &id)? {
        WriteOutcome::Applied => Ok(HttpResponse::NoContent().finish()),
        WriteOutcome::Protected => Err(ApiError::forbidden("Default rules cannot be deleted")),
        WriteOutcome::NotFound => {
            Err(ApiError::not_found(format!("No rule found with id {}", id)))
        }
    }
}

// --- Roles ---

#[post("")]
pub async fn create_role(
    pool: web::Data<StorePool>,
    req: web::Json<CreateRoleRequest>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();
    let req = req.into_inner();

    let role = RoleStore::insert(
        &conn,
        &req.name,
        &req.description,
        &req.content,
        req.category,
        &req.expertise,
    )?;
    Ok(HttpResponse::Created().json(role))
}

#[get("")]
pub async fn list_roles(pool: web::Data<StorePool>) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();

    let roles = RoleStore::list(&conn)?;
    Ok(HttpResponse::Ok().json(roles))
}

#[get("/{id}")]
pub async fn get_role(
    pool: web::Data<StorePool>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();

    match RoleStore::get(&conn, &id)? {
        Some(role) => Ok(HttpResponse::Ok().json(role)),
        None => Err(ApiError::not_found(format!("No role found with id {}", id))),
    }
}

#[put("/{id}")]
pub async fn update_role(
    pool: web::Data<StorePool>,
    id: web::Path<String>,
    req: web::Json<UpdateRoleRequest>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();
    let id = id.into_inner();
    let req = req.into_inner();

    let outcome = RoleStore::update(
        &conn,
        &id,
        req.name.as_deref(),
        req.description.as_deref(),
        req.content.as_deref(),
        req.category,
        req.expertise.as_deref(),
    )?;

    match outcome {
        WriteOutcome::Applied => match RoleStore::get(&conn, &id)? {
            Some(role) => Ok(HttpResponse::Ok().json(role)),
            None => Err(ApiError::not_found(format!("No role found with id {}", id))),
        },
        WriteOutcome::Protected => Err(ApiError::forbidden("Default roles cannot be modified")),
        WriteOutcome::NotFound => {
            Err(ApiError::not_found(format!("No role found with id {}", id)))
        }
    }
}

#[delete("/{id}")]
pub async fn delete_role(
    pool: web::Data<StorePool>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();
    let id = id.into_inner();

    match RoleStore::delete(&conn, &id)? {
        WriteOutcome::Applied => Ok(HttpResponse::NoContent().finish()),
        WriteOutcome::Protected => Err(ApiError::forbidden("Default roles cannot be deleted")),
        WriteOutcome::NotFound => {
            Err(ApiError::not_found(format!("No role found with id {}", id)))
        }
    }
}

// --- Profile ---

#[get("/profile")]
pub async fn get_profile(pool: web::Data<StorePool>) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();

    let profile = ProfileStore::get(&conn)?;
    Ok(HttpResponse::Ok().json(profile))
}

#[put("/profile")]
pub async fn update_profile(
    pool: web::Data<StorePool>,
    req: web::Json<UserProfile>,
) -> Result<HttpResponse, ApiError> {
    let conn = pool.lock().unwrap();
    let profile = req.into_inner();

    ProfileStore::upsert(&conn, &profile)?;
    Ok(HttpResponse::Ok().json(profile))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(crate::api::relay::chat_relay)
            .service(crate::api::media::transcribe)
            .service(crate::api::media::upload)
            .service(get_profile)
            .service(update_profile)
            .service(
                web::scope("/chats")
                    .service(create_chat)
                    .service(list_chats)
                    .service(get_chat)
                    .service(delete_chat)
                    .service(append_message)
                    .service(get_messages)
                    .service(export_chat),
            )
            .service(
                web::scope("/prompts")
                    .service(export_prompts)
                    .service(create_prompt)
                    .service(list_prompts)
                    .service(get_prompt)
                    .service(update_prompt)
                    .service(delete_prompt),
            )
            .service(
                web::scope("/rules")
                    .service(create_rule)
                    .service(list_rules)
                    .service(get_rule)
                    .service(update_rule)
                    .service(delete_rule),
            )
            .service(
                web::scope("/roles")
                    .service(create_role)
                    .service(list_roles)
                    .service(get_role)
                    .service(update_role)
                    .service(delete_role),
            ),
    );
}
