use std::io::{self, BufRead, Write};

use content::InMemorySource;
use practice_core::Clock;
use practice_core::model::{OptionKey, QuestionId, SetId};
use services::{
    AnswerEvent, ContentRenderer, ExitKind, ExitOutcome, MarkdownRenderer, Phase, RenderStyle,
    SessionController, SessionView,
};
use tracing::error;

const FIXTURE_SETS: &str = include_str!("../fixtures/practice_sets.json");

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let source = match InMemorySource::from_json(FIXTURE_SETS) {
        Ok(source) => source,
        Err(err) => {
            error!(%err, "bundled fixtures failed to decode");
            return;
        }
    };

    let mut controller = match SessionController::from_source(Clock::default_clock(), &source).await
    {
        Ok(controller) => controller,
        Err(err) => {
            error!(%err, "failed to load practice sets");
            return;
        }
    };
    let mut renderer = MarkdownRenderer::new();

    println!("Practice session demo. Type `help` for commands.");
    print_sets(&controller);

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let Some(Ok(line)) = stdin.lock().lines().next() else {
            break;
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(2, ' ');
        let command = parts.next().unwrap_or_default();
        let arg = parts.next().unwrap_or_default().trim();

        let result = match command {
            "help" => {
                print_help();
                Ok(())
            }
            "list" => {
                print_sets(&controller);
                Ok(())
            }
            "start" => controller.start(&SetId::new(arg)),
            "pick" => match current_question_id(&controller) {
                Some(id) => controller.record(&id, AnswerEvent::SelectSingle(OptionKey::new(arg))),
                None => no_question(),
            },
            "toggle" => match current_question_id(&controller) {
                Some(id) => controller.record(&id, AnswerEvent::ToggleMulti(OptionKey::new(arg))),
                None => no_question(),
            },
            "type" => match current_question_id(&controller) {
                Some(id) => arg
                    .chars()
                    .try_for_each(|ch| controller.record(&id, AnswerEvent::NumericChar(ch))),
                None => no_question(),
            },
            "del" => match current_question_id(&controller) {
                Some(id) => controller.record(&id, AnswerEvent::NumericBackspace),
                None => no_question(),
            },
            "next" => controller.next().map(|_| ()),
            "prev" => controller.prev().map(|_| ()),
            "finish" => controller.finish(),
            "back" => controller.request_exit(ExitKind::ToList).map(|outcome| {
                if outcome == ExitOutcome::ConfirmationRequired {
                    println!("Leave the running session? `yes` to confirm, `no` to stay.");
                }
            }),
            "yes" => controller.confirm_exit().map(|_| ()),
            "no" => {
                controller.decline_exit();
                Ok(())
            }
            "retry" => controller.retry(),
            "quit" => break,
            other => {
                println!("unknown command `{other}`; try `help`");
                Ok(())
            }
        };

        if let Err(err) = result {
            println!("!! {err}");
        }
        print_view(&controller.view(), &mut renderer);
    }
}

fn current_question_id(controller: &SessionController) -> Option<QuestionId> {
    controller
        .session()
        .current_question()
        .map(|question| question.id().clone())
}

fn no_question() -> Result<(), services::SessionError> {
    println!("no question on screen");
    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  list                 show practice sets");
    println!("  start <set-id>       begin a session");
    println!("  pick <key>           select a single-choice option");
    println!("  toggle <key>         toggle a multi-choice option");
    println!("  type <chars>         type into the numeric entry");
    println!("  del                  numeric backspace");
    println!("  next / prev          move between questions");
    println!("  finish               finish and see the score");
    println!("  back                 leave the session (asks to confirm)");
    println!("  retry                try the reviewed set again");
    println!("  quit");
}

fn print_sets(controller: &SessionController) {
    println!("available sets:");
    for set in controller.session().sets() {
        println!(
            "  {} — {} ({} questions)",
            set.id(),
            set.title().unwrap_or("untitled"),
            set.question_count()
        );
    }
}

fn print_view(view: &SessionView, renderer: &mut MarkdownRenderer) {
    match view.phase {
        Phase::Browsing => {}
        Phase::InProgress => {
            let Some(question) = &view.question else {
                return;
            };
            let index = view.index.unwrap_or(0);
            let key = format!("{}.body", question.id());
            let block = renderer.render(question.body(), &key, RenderStyle::QuestionBody);
            println!(
                "[{}/{}] Q{}: {}  ({}s)",
                index + 1,
                view.total,
                question.serial(),
                block.html.trim(),
                view.elapsed_secs
            );
            for option in question.spec().options() {
                let label = option.content.as_text().unwrap_or("(image)");
                println!("    {}. {label}", option.key);
            }
            if let Some(answer) = &view.answer {
                println!("    current answer: {answer:?}");
            }
        }
        Phase::Reviewing => {
            let Some(summary) = &view.summary else {
                return;
            };
            println!(
                "score: {}/{} correct ({}%), {}s total",
                summary.correct(),
                summary.total(),
                summary.percentage(),
                summary.time_secs()
            );
            for result in summary.results() {
                let mark = if result.correct { "ok " } else { "MISS" };
                println!(
                    "  {mark} Q{} ({}s) {:?}",
                    result.serial, result.time_secs, result.answer
                );
            }
            println!("`retry` to try again, `back` to return to the list");
        }
    }
}
