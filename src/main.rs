mod config;
mod quiz;

use std::sync::Arc;

use dotenv::dotenv;
use log::{debug, info, warn};
use quiz::{
    catalog::CategorySummary,
    diagnostics::Diagnostics,
    exam::{self, ExamPreset},
    loader::QuestionBank,
};
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup},
};

type QuizDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    ReceiveCategoryChoice,
    ReceiveExamChoice,
    ReceiveSubcategoryChoice {
        category: String,
    },
    ReceiveAmountOfQuestions {
        category: String,
        subcategory: Option<String>,
    },
    Quiz {
        quiz: quiz::Quiz,
        question_number: usize,
        score: usize,
    },
}

type DialogueStorage = Arc<ErasedStorage<State>>;

#[tokio::main]
async fn main() -> HandlerResult {
    dotenv().ok();
    pretty_env_logger::init();

    let config = config::Config::from_env();

    let bot = Bot::from_env();

    debug!("Opening dialogue storage {}", config.dialogue_db);
    let storage: DialogueStorage = SqliteStorage::open(&config.dialogue_db, Json)
        .await?
        .erase();

    let bank = Arc::new(QuestionBank::new(
        config.bank_root.clone(),
        config.plain_text_mode,
    ));
    info!(
        "Starting quiz bot with question bank at {}",
        bank.root().display()
    );

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::ReceiveCategoryChoice].endpoint(receive_category_choice))
            .branch(dptree::case![State::ReceiveExamChoice].endpoint(receive_exam_choice))
            .branch(
                dptree::case![State::ReceiveSubcategoryChoice { category }]
                    .endpoint(receive_subcategory_choice),
            )
            .branch(
                dptree::case![State::ReceiveAmountOfQuestions {
                    category,
                    subcategory
                }]
                .endpoint(receive_amount_of_questions),
            )
            .branch(
                dptree::case![State::Quiz {
                    quiz,
                    question_number,
                    score
                }]
                .endpoint(run_quiz),
            ),
    )
    .dependencies(dptree::deps![storage, bank])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;

    Ok(())
}

const ALL_SUBCATEGORIES: &str = "All";
const START_QUIZ: &str = "Go!";
const MOCK_TEST: &str = "📝 Mock test";

/// Reads the catalog off the async runtime.
async fn load_catalog(
    bank: Arc<QuestionBank>,
) -> Result<Vec<CategorySummary>, tokio::task::JoinError> {
    tokio::task::spawn_blocking(move || {
        let mut diagnostics = Diagnostics::new();
        let catalog = bank.catalog(&mut diagnostics);
        catalog.into_values().collect()
    })
    .await
}

fn single_column_keyboard<I, S>(labels: I) -> KeyboardMarkup
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    KeyboardMarkup::new(
        labels
            .into_iter()
            .map(|label| vec![KeyboardButton::new(label)])
            .collect::<Vec<_>>(),
    )
    .resize_keyboard(true)
}

async fn offer_categories(
    bot: &Bot,
    dialogue: &QuizDialogue,
    msg: &Message,
    bank: Arc<QuestionBank>,
) -> HandlerResult {
    let categories = load_catalog(bank).await?;
    if categories.is_empty() {
        bot.send_message(msg.chat.id, "The question bank is empty, try again later.")
            .await?;
        dialogue.update(State::Start).await?;
        return Ok(());
    }

    let keyboard = single_column_keyboard(
        categories
            .iter()
            .map(|c| format!("{} {}", c.meta.icon, c.display_name))
            .chain(std::iter::once(MOCK_TEST.to_string())),
    );
    bot.send_message(msg.chat.id, "Pick a category")
        .reply_markup(keyboard)
        .await?;
    dialogue.update(State::ReceiveCategoryChoice).await?;
    Ok(())
}

const GREETING_TEXT: &str =
    "Hi! I am a quiz bot. Pick a category and I will ask you a few questions from the bank.";
async fn start(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    bank: Arc<QuestionBank>,
) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;
    offer_categories(&bot, &dialogue, &msg, bank).await
}

async fn receive_category_choice(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    bank: Arc<QuestionBank>,
) -> HandlerResult {
    if msg.text() == Some(MOCK_TEST) {
        let labels = exam::all_presets().map(|preset| preset.name);
        bot.send_message(msg.chat.id, "Pick a mock test")
            .reply_markup(single_column_keyboard(labels))
            .await?;
        dialogue.update(State::ReceiveExamChoice).await?;
        return Ok(());
    }

    let categories = load_catalog(bank).await?;
    let chosen = msg.text().and_then(|text| {
        let alias = exam::resolve_category_alias(text);
        categories.into_iter().find(|c| {
            text == format!("{} {}", c.meta.icon, c.display_name)
                || text.eq_ignore_ascii_case(&c.display_name)
                || alias == Some(c.id.as_str())
        })
    });

    let Some(category) = chosen else {
        bot.send_message(msg.chat.id, "Please choose one of the categories")
            .await?;
        return Ok(());
    };

    let labels = std::iter::once(ALL_SUBCATEGORIES.to_string()).chain(
        category
            .subcategories
            .iter()
            .map(|entry| entry.display_name.clone()),
    );
    bot.send_message(
        msg.chat.id,
        format!("{} {}: pick a topic", category.meta.icon, category.display_name),
    )
    .reply_markup(single_column_keyboard(labels))
    .await?;

    dialogue
        .update(State::ReceiveSubcategoryChoice {
            category: category.id,
        })
        .await?;
    Ok(())
}

async fn receive_exam_choice(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    bank: Arc<QuestionBank>,
) -> HandlerResult {
    // Unrecognised choices get the general mock test.
    let preset: &'static ExamPreset = exam::exam_preset(msg.text().unwrap_or_default());

    let builder_bank = bank.clone();
    let mock_test = tokio::task::spawn_blocking(move || {
        exam::build_mock_test(&builder_bank, preset, &mut Diagnostics::new())
    })
    .await?;

    if mock_test.questions.is_empty() {
        bot.send_message(msg.chat.id, "There are no questions for this mock test yet.")
            .await?;
        return offer_categories(&bot, &dialogue, &msg, bank).await;
    }

    let outline = mock_test
        .sections
        .iter()
        .map(|(name, count)| format!("{}: {} questions", name, count))
        .collect::<Vec<_>>()
        .join("\n");
    bot.send_message(
        msg.chat.id,
        format!(
            "{}\n{}\n\n{} of {} questions, {} marks",
            mock_test.name,
            outline,
            mock_test.questions.len(),
            preset.total_questions(),
            preset.total_marks()
        ),
    )
    .reply_markup(single_column_keyboard([START_QUIZ]))
    .await?;

    dialogue
        .update(State::Quiz {
            quiz: quiz::Quiz::new(mock_test.questions),
            question_number: 0,
            score: 0,
        })
        .await?;
    Ok(())
}

async fn receive_subcategory_choice(
    bot: Bot,
    dialogue: QuizDialogue,
    category: String,
    msg: Message,
    bank: Arc<QuestionBank>,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please choose one of the topics")
            .await?;
        return Ok(());
    };

    let subcategory = if text == ALL_SUBCATEGORIES {
        None
    } else {
        let id = category.clone();
        let entries = tokio::task::spawn_blocking(move || {
            bank.subcategories(&id, &mut Diagnostics::new())
        })
        .await?;
        match entries.into_iter().find(|entry| entry.display_name == text) {
            Some(entry) => Some(entry.subcategory),
            None => {
                bot.send_message(msg.chat.id, "Please choose one of the topics")
                    .await?;
                return Ok(());
            }
        }
    };

    bot.send_message(msg.chat.id, "How many questions?")
        .reply_markup(single_column_keyboard(["5", "10", "15"]))
        .await?;
    dialogue
        .update(State::ReceiveAmountOfQuestions {
            category,
            subcategory,
        })
        .await?;
    Ok(())
}

async fn receive_amount_of_questions(
    bot: Bot,
    dialogue: QuizDialogue,
    (category, subcategory): (String, Option<String>),
    msg: Message,
    bank: Arc<QuestionBank>,
) -> HandlerResult {
    let amount = match msg.text().map(|t| t.trim().parse::<usize>()) {
        Some(Ok(amount)) if amount > 0 => amount,
        Some(Ok(_)) => {
            bot.send_message(msg.chat.id, "The number of questions cannot be 0")
                .await?;
            return Ok(());
        }
        _ => {
            bot.send_message(msg.chat.id, "Please enter a number").await?;
            return Ok(());
        }
    };

    let loader_bank = bank.clone();
    let (questions, diagnostics) = tokio::task::spawn_blocking(move || {
        let mut diagnostics = Diagnostics::new();
        let questions = loader_bank.load_questions(
            &category,
            subcategory.as_deref(),
            amount,
            &mut diagnostics,
        );
        (questions, diagnostics)
    })
    .await?;

    let warnings = diagnostics.warnings().count();
    if warnings > 0 {
        warn!("{} warnings while loading questions", warnings);
    }

    let quiz = quiz::Quiz::new(questions);
    if quiz.is_empty() {
        bot.send_message(msg.chat.id, "There are no questions for this topic yet.")
            .await?;
        return offer_categories(&bot, &dialogue, &msg, bank).await;
    }
    if quiz.len() < amount {
        bot.send_message(
            msg.chat.id,
            format!("Only {} questions are available.", quiz.len()),
        )
        .await?;
    }

    bot.send_message(msg.chat.id, "Great! Let's begin!")
        .reply_markup(single_column_keyboard([START_QUIZ]))
        .await?;

    dialogue
        .update(State::Quiz {
            quiz,
            question_number: 0,
            score: 0,
        })
        .await?;
    Ok(())
}

async fn run_quiz(
    bot: Bot,
    dialogue: QuizDialogue,
    (quiz, question_number, score): (quiz::Quiz, usize, usize),
    msg: Message,
    bank: Arc<QuestionBank>,
) -> HandlerResult {
    let mut current_score = score;
    if question_number != 0 {
        let question = &quiz.questions[question_number - 1];
        let chosen = msg
            .text()
            .map(str::trim)
            .and_then(|t| t.chars().next().filter(|_| t.chars().count() == 1))
            .map(|c| c.to_ascii_lowercase())
            .filter(|c| question.options.contains_key(c));

        let Some(letter) = chosen else {
            bot.send_message(msg.chat.id, "Please answer with one of the option letters")
                .await?;
            return Ok(());
        };

        if question.is_correct(letter) {
            bot.send_message(msg.chat.id, "Correct!").await?;
            current_score += 1;
        } else {
            let correct = question.correct_option().unwrap_or_default();
            bot.send_message(
                msg.chat.id,
                format!(
                    "Wrong! The answer is {}) {}",
                    question.answer_letter, correct
                ),
            )
            .await?;
        }
    }

    if question_number >= quiz.len() {
        let quiz_score = format!(
            "The quiz is over! You answered {} of {} questions correctly.",
            current_score,
            quiz.len()
        );
        bot.send_message(msg.chat.id, quiz_score).await?;
        return offer_categories(&bot, &dialogue, &msg, bank).await;
    }

    let question = &quiz.questions[question_number];
    let question_text = format!(
        "{} Question {} of {}\n\n{}",
        question.category.icon,
        question_number + 1,
        quiz.len(),
        question.render()
    );
    let answers = question
        .options
        .keys()
        .map(|letter| KeyboardButton::new(letter.to_string()))
        .collect::<Vec<_>>();

    bot.send_message(msg.chat.id, question_text)
        .reply_markup(KeyboardMarkup::new(vec![answers]).resize_keyboard(true))
        .await?;

    dialogue
        .update(State::Quiz {
            quiz,
            question_number: question_number + 1,
            score: current_score,
        })
        .await?;
    Ok(())
}
