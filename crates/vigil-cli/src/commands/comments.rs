use anyhow::Result;
use colored::Colorize;

use vigil::{CommentBoard, PostOutcome};

use super::App;
use crate::output::{print_comment, print_notifications};

pub async fn execute(app: &App, posts: &[String], likes: &[String]) -> Result<()> {
    let mut board = app.comment_board();

    for text in posts {
        post(app, &mut board, text).await;
    }

    for id in likes {
        match board.like(id) {
            Some(count) => println!("{} {} now has {} likes", "♥".magenta(), id, count),
            None => println!("{} no comment with id {}", "•".yellow(), id),
        }
    }

    print_board(&board);
    Ok(())
}

pub async fn post(app: &App, board: &mut CommentBoard, text: &str) {
    board.set_draft(text);
    let draft = board.draft();
    let counter = format!("{}/1000", draft.len());
    let counter = if draft.near_limit() {
        counter.yellow()
    } else {
        counter.dimmed()
    };
    println!("{} {}", "Posting...".cyan(), counter);

    if let PostOutcome::Busy = board.post_and_wait().await {
        println!("{}", "a comment is already being posted".yellow());
    }
    print_notifications(&app.inbox);
}

pub fn print_board(board: &CommentBoard) {
    println!();
    println!("{}", format!("Recent Comments ({})", board.comments().len()).bold());
    for comment in board.comments() {
        print_comment(comment);
    }
}
