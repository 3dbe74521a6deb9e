use colored::*;

/// Print one model answer to stdout.
pub fn display_answer(answer: &str) {
    println!("{}", answer.trim_end());
}

/// Print partially accumulated answers when a turn ends early.
pub fn display_partial_answers(answers: &[String]) {
    if answers.is_empty() {
        return;
    }
    eprintln!("{}", "Partial response before the turn was cut short:".yellow());
    for answer in answers {
        println!("{}", answer.trim_end());
    }
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", "Error:".red(), message);
}

pub fn display_notice(message: &str) {
    eprintln!("{}", message.dimmed());
}
