use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, warn};

use models::{comment, errors::ModelError, question};
use crate::domain::{CommentChanges, NewComment};
use crate::errors::ServiceError;

type Timestamp = sea_orm::prelude::DateTimeWithTimeZone;

/// Shift a question's `num_comments` by `delta` in a single UPDATE and stamp `date_updated`.
/// Decrements only apply while the counter stays non-negative.
/// Returns the number of rows changed (0 or 1).
async fn adjust_comment_count<C: ConnectionTrait>(
    db: &C,
    question_id: i32,
    delta: i32,
    now: Timestamp,
) -> Result<u64, ServiceError> {
    let mut update = question::Entity::update_many()
        .col_expr(
            question::Column::NumComments,
            Expr::col(question::Column::NumComments).add(delta),
        )
        .col_expr(question::Column::DateUpdated, Expr::value(now))
        .filter(question::Column::QuestionId.eq(question_id));
    if delta < 0 {
        update = update.filter(question::Column::NumComments.gte(-delta));
    }
    let rows = update.exec(db).await?.rows_affected;
    debug!(question_id, delta, rows, "num_comments_adjusted");
    Ok(rows)
}

/// Delete exactly one comment row. A concurrent delete that already removed it
/// leaves nothing to delete, which is reported as `NotFound` so the caller
/// never adjusts the counter for a row it did not remove.
async fn remove_comment_row<C: ConnectionTrait>(db: &C, comment_id: i32) -> Result<(), ServiceError> {
    let removed = comment::Entity::delete_by_id(comment_id).exec(db).await?.rows_affected;
    debug!(comment_id, removed, "comment_row_deleted");
    if removed != 1 {
        return Err(ServiceError::not_found("comment"));
    }
    Ok(())
}

fn parent_missing(e: ModelError) -> ServiceError {
    match e {
        ModelError::ForeignKey(_) => ServiceError::not_found("question"),
        other => other.into(),
    }
}

/// Insert a comment and bump the parent's counter in one transaction.
#[instrument(skip(db, input), fields(question_id = input.question_id))]
pub async fn add_comment(db: &DatabaseConnection, input: NewComment) -> Result<comment::Model, ServiceError> {
    let txn = db.begin().await?;
    if question::Entity::find_by_id(input.question_id).one(&txn).await?.is_none() {
        return Err(ServiceError::not_found("question"));
    }
    // 父记录可能在检查之后被并发删除，外键冲突按 NotFound 处理
    let created = comment::create(
        &txn,
        input.question_id,
        &input.user_id,
        &input.content,
        input.is_anonymous,
        &input.source,
    )
    .await
    .map_err(parent_missing)?;
    let changed = adjust_comment_count(&txn, input.question_id, 1, created.date_created).await?;
    if changed != 1 {
        // 父记录在事务中消失，整体回滚
        return Err(ServiceError::not_found("question"));
    }
    txn.commit().await?;
    info!(comment_id = created.comment_id, "comment_added");
    Ok(created)
}

/// All comments of a question in insertion order; empty when there are none.
pub async fn get_comments(db: &DatabaseConnection, question_id: i32) -> Result<Vec<comment::Model>, ServiceError> {
    Ok(comment::list_by_question(db, question_id).await?)
}

/// Replace a comment's content and anonymity flag. The comment must belong to
/// the named question; the parent's `date_updated` is touched as well.
#[instrument(skip(db, changes), fields(question_id = changes.question_id, comment_id = changes.comment_id))]
pub async fn update_comment(db: &DatabaseConnection, changes: CommentChanges) -> Result<comment::Model, ServiceError> {
    comment::validate_content(&changes.content)?;

    let txn = db.begin().await?;
    let existing = comment::Entity::find_by_id(changes.comment_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("comment"))?;
    if existing.question_id != changes.question_id {
        warn!(actual_question_id = existing.question_id, "comment_owner_mismatch");
        return Err(ServiceError::Consistency(format!(
            "comment {} does not belong to question {}",
            changes.comment_id, changes.question_id
        )));
    }

    let now: Timestamp = Utc::now().into();
    let mut am: comment::ActiveModel = existing.into();
    am.content = Set(changes.content);
    am.is_anonymous = Set(changes.is_anonymous);
    am.date_updated = Set(now);
    let updated = am.update(&txn).await?;

    let touched = question::Entity::update_many()
        .col_expr(question::Column::DateUpdated, Expr::value(now))
        .filter(question::Column::QuestionId.eq(changes.question_id))
        .exec(&txn)
        .await?
        .rows_affected;
    if touched == 0 {
        return Err(ServiceError::not_found("question"));
    }
    txn.commit().await?;
    info!("comment_updated");
    Ok(updated)
}

/// Remove one comment and decrement the parent's counter in one transaction.
#[instrument(skip(db))]
pub async fn delete_comment(db: &DatabaseConnection, question_id: i32, comment_id: i32) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let existing = comment::Entity::find_by_id(comment_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("comment"))?;
    if existing.question_id != question_id {
        return Err(ServiceError::Consistency(format!(
            "comment {} does not belong to question {}",
            comment_id, question_id
        )));
    }

    remove_comment_row(&txn, comment_id).await?;
    let changed = adjust_comment_count(&txn, question_id, -1, Utc::now().into()).await?;
    if changed == 0 {
        // 计数已为 0 或父记录不存在，拒绝并回滚
        let parent = question::Entity::find_by_id(question_id).one(&txn).await?;
        return Err(match parent {
            None => ServiceError::not_found("question"),
            Some(q) => {
                warn!(num_comments = q.num_comments, "comment_counter_underflow");
                ServiceError::Consistency(format!("question {} has no comments to remove", question_id))
            }
        });
    }
    txn.commit().await?;
    info!("comment_deleted");
    Ok(())
}

/// True number of comment rows referencing the question.
pub async fn count_comments(db: &DatabaseConnection, question_id: i32) -> Result<u64, ServiceError> {
    Ok(comment::Entity::find()
        .filter(comment::Column::QuestionId.eq(question_id))
        .count(db)
        .await?)
}
