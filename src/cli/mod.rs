pub mod commands;

use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::cli::commands::{ChatAction, Commands};
use crate::config::AppConfig;
use crate::context::compose_system_message;
use crate::llm::{
    models::{ChatOptions, Message as LlmMessage},
    openai::OpenAiClient,
    CompletionProvider, LlmError,
};
use crate::store::chats::{ChatStore, UNTITLED};
use crate::store::get_connection;
use crate::store::models::ChatRole;
use crate::store::profile::ProfileStore;

pub async fn run_cli(command: Commands, config_path: String) {
    let config = AppConfig::load(&config_path).expect("Failed to load config");

    match command {
        Commands::Serve => {
            panic!("Serve command should be intercepted by main.rs to boot actix-web");
        }
        Commands::Chats { action } => {
            let pool = get_connection(&config.database).expect("Store error");
            let conn = pool.lock().unwrap();

            match action {
                ChatAction::Create { title } => {
                    let title = title.unwrap_or_else(|| UNTITLED.to_string());
                    match ChatStore::insert_chat(&conn, &title) {
                        Ok(chat) => println!("Created Chat: {} ({})", chat.title, chat.id),
                        Err(e) => eprintln!("Error: {}", e),
                    }
                }
                ChatAction::List => match ChatStore::list_chats(&conn, 50, 0) {
                    Ok(chats) => {
                        if chats.is_empty() {
                            println!("No chats found.");
                        } else {
                            println!("{:<38} | {:<20} | {}", "ID", "Created At", "Title");
                            println!("{:-<38}-+-{:-<20}-+-{:-<20}", "", "", "");
                            for c in chats {
                                println!("{:<38} | {:<20} | {}", c.id.to_string(), c.created_at, c.title);
                            }
                        }
                    }
                    Err(e) => eprintln!("Error: {}", e),
                },
                ChatAction::Delete { id } => match ChatStore::delete_chat(&conn, id) {
                    Ok(_) => println!("Deleted chat {}", id),
                    Err(e) => eprintln!("Error: {}", e),
                },
                ChatAction::Export { id, path } => {
                    let chat = match ChatStore::get_chat(&conn, id) {
                        Ok(Some(c)) => c,
                        _ => {
                            eprintln!("Chat {} not found.", id);
                            return;
                        }
                    };

                    let transcript = match ChatStore::export_transcript(&conn, &chat) {
                        Ok(t) => t,
                        Err(e) => {
                            eprintln!("Error: {}", e);
                            return;
                        }
                    };

                    let export_path = path.unwrap_or_else(|| format!("chat_{}.txt", id));
                    if let Err(e) = std::fs::write(&export_path, transcript) {
                        eprintln!("Failed to write export: {}", e);
                        return;
                    }

                    println!("Chat exported successfully to: {}", export_path);
                }
            }
        }
        Commands::Chat { chat } => {
            run_repl(chat, config).await;
        }
    }
}

async fn run_repl(chat_id: Uuid, config: AppConfig) {
    let pool = get_connection(&config.database).expect("Store error");

    let chat_exists = {
        let conn = pool.lock().unwrap();
        ChatStore::get_chat(&conn, chat_id).unwrap_or(None).is_some()
    };

    if !chat_exists {
        eprintln!("Chat {} not found.", chat_id);
        return;
    }

    // The stored profile is the only context the REPL composes in; prompts
    // and roles are a client-side selection the terminal doesn't offer.
    let system = {
        let conn = pool.lock().unwrap();
        let profile = ProfileStore::get(&conn).unwrap_or_default();
        compose_system_message(None, None, Some(&profile))
    };

    let llm: Arc<dyn CompletionProvider> = Arc::new(OpenAiClient::new(&config.openai));

    println!("--- Optimaize Terminal Chat ---");
    println!("Connected to Chat: {}", chat_id);
    println!("Type /exit to quit.");
    println!("-------------------------------");

    loop {
        print!("\nUser> ");
        io::stdout().flush().unwrap();

        let mut input = String::new();
        io::stdin().read_line(&mut input).unwrap();
        let text = input.trim();

        if text.is_empty() {
            continue;
        }
        if text == "/exit" || text == "/quit" {
            break;
        }

        {
            let conn = pool.lock().unwrap();
            if let Err(e) = ChatStore::append_message(&conn, chat_id, ChatRole::User, text) {
                eprintln!("Failed to save message: {}", e);
                continue;
            }
        }

        let history = {
            let conn = pool.lock().unwrap();
            ChatStore::get_messages(&conn, chat_id, 50, 0).unwrap_or_default()
        };

        let mut llm_messages: Vec<LlmMessage> = Vec::new();
        if !system.is_empty() {
            llm_messages.push(LlmMessage::system(system.clone()));
        }
        llm_messages.extend(history.into_iter().map(|m| LlmMessage {
            role: m.role.as_str().to_string(),
            content: m.content,
        }));

        let options = ChatOptions {
            model: Some(config.openai.chat_model.clone()),
            temperature: Some(config.relay.temperature),
            max_tokens: Some(config.relay.max_tokens),
        };

        let (tx, mut rx) = mpsc::channel::<Result<String, LlmError>>(100);
        let llm_clone = llm.clone();

        print!("Assistant> ");
        io::stdout().flush().unwrap();

        tokio::spawn(async move {
            llm_clone.stream_chat(&llm_messages, options, tx).await;
        });

        let mut response_text = String::new();
        while let Some(event) = rx.recv().await {
            match event {
                Ok(chunk) => {
                    print!("{}", chunk);
                    io::stdout().flush().unwrap();
                    response_text.push_str(&chunk);
                }
                Err(e) => {
                    eprintln!("\n[stream error: {}]", e);
                    break;
                }
            }
        }
        println!();

        if !response_text.is_empty() {
            let conn = pool.lock().unwrap();
            let _ = ChatStore::append_message(&conn, chat_id, ChatRole::Assistant, &response_text);
        }
    }
}
