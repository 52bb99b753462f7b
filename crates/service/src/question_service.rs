use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info, instrument};

use models::{comment, errors::ModelError, question};
use crate::domain::{FaqEntry, NewQuestion, QuestionChanges};
use crate::errors::ServiceError;

/// Number of questions returned by the FAQ listing.
pub const FAQ_LIMIT: u64 = 10;

fn content_conflict(e: ModelError) -> ServiceError {
    match e {
        ModelError::Unique(_) => ServiceError::duplicate_content(),
        other => other.into(),
    }
}

/// Create a question; rejects content that another question already carries.
#[instrument(skip(db, input), fields(user_id = %input.user_id))]
pub async fn create_question(db: &DatabaseConnection, input: NewQuestion) -> Result<question::Model, ServiceError> {
    if question::find_by_content(db, &input.content).await?.is_some() {
        return Err(ServiceError::duplicate_content());
    }
    // the unique index still guards against a concurrent insert of the same content
    let created = question::create(
        db,
        &input.user_id,
        input.title.as_deref(),
        &input.content,
        input.is_anonymous,
        &input.source,
    )
    .await
    .map_err(content_conflict)?;
    info!(question_id = created.question_id, source = %created.source, "question_created");
    Ok(created)
}

/// Get a question by id.
pub async fn get_question(db: &DatabaseConnection, question_id: i32) -> Result<Option<question::Model>, ServiceError> {
    Ok(question::Entity::find_by_id(question_id).one(db).await?)
}

/// The first `FAQ_LIMIT` questions by ascending id, each with its comments.
pub async fn get_faqs(db: &DatabaseConnection) -> Result<Vec<FaqEntry>, ServiceError> {
    let questions = question::Entity::find()
        .order_by_asc(question::Column::QuestionId)
        .limit(FAQ_LIMIT)
        .all(db)
        .await?;
    let comments = questions.load_many(comment::Entity, db).await?;
    Ok(questions
        .into_iter()
        .zip(comments)
        .map(|(question, mut comments)| {
            comments.sort_by_key(|c| c.comment_id);
            FaqEntry { question, comments }
        })
        .collect())
}

/// Overwrite title, content and the anonymity flag of one question.
#[instrument(skip(db, changes))]
pub async fn update_question(
    db: &DatabaseConnection,
    question_id: i32,
    changes: QuestionChanges,
) -> Result<question::Model, ServiceError> {
    question::validate_content(&changes.content)?;
    question::validate_title(changes.title.as_deref())?;

    let existing = question::Entity::find_by_id(question_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("question"))?;

    if existing.content != changes.content {
        if let Some(other) = question::find_by_content(db, &changes.content).await? {
            if other.question_id != question_id {
                return Err(ServiceError::duplicate_content());
            }
        }
    }

    let mut am: question::ActiveModel = existing.into();
    if let Some(title) = changes.title { am.title = Set(Some(title)); }
    am.content = Set(changes.content);
    am.is_anonymous = Set(changes.is_anonymous);
    am.date_updated = Set(changes.date_updated.unwrap_or_else(|| Utc::now().into()));
    let updated = am
        .update(db)
        .await
        .map_err(|e| content_conflict(ModelError::from_db(e)))?;
    info!(question_id, "question_updated");
    Ok(updated)
}

/// Delete a question together with every comment it owns, atomically.
/// Returns the number of comments removed.
#[instrument(skip(db))]
pub async fn delete_question(db: &DatabaseConnection, question_id: i32) -> Result<u64, ServiceError> {
    let txn = db.begin().await?;
    let existing = question::Entity::find_by_id(question_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("question"))?;

    let removed = comment::Entity::delete_many()
        .filter(comment::Column::QuestionId.eq(existing.question_id))
        .exec(&txn)
        .await?
        .rows_affected;
    debug!(question_id, removed, "comments_cascaded");
    let deleted = question::Entity::delete_by_id(existing.question_id).exec(&txn).await?.rows_affected;
    if deleted != 1 {
        return Err(ServiceError::not_found("question"));
    }
    txn.commit().await?;

    info!(question_id, comments_removed = removed, "question_deleted");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment_service::{add_comment, count_comments, get_comments};
    use crate::test_support::{get_db, new_comment, new_question};

    #[tokio::test]
    async fn question_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let q = create_question(&db, new_question("Does this cause drowsiness?")).await?;
        assert_eq!(q.num_comments, 0);
        assert_eq!(q.source, configs::DEFAULT_SOURCE);

        let found = get_question(&db, q.question_id).await?.unwrap();
        assert_eq!(found.content, "Does this cause drowsiness?");

        let updated = update_question(
            &db,
            q.question_id,
            QuestionChanges {
                title: None,
                content: "Does this cause drowsiness at night?".into(),
                is_anonymous: true,
                date_updated: None,
            },
        )
        .await?;
        assert_eq!(updated.content, "Does this cause drowsiness at night?");
        assert!(updated.is_anonymous);
        assert_eq!(updated.title.as_deref(), Some("Side effects"));
        assert!(updated.date_updated >= q.date_updated);
        assert_eq!(updated.date_created, q.date_created);

        let removed = delete_question(&db, q.question_id).await?;
        assert_eq!(removed, 0);
        assert!(get_question(&db, q.question_id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_content_rejected_without_insert() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        create_question(&db, new_question("Same text")).await?;
        let err = create_question(&db, new_question("Same text")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Duplicate(_)));
        assert_eq!(question::Entity::find().all(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_to_other_questions_content_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let a = create_question(&db, new_question("first")).await?;
        create_question(&db, new_question("second")).await?;
        let err = update_question(
            &db,
            a.question_id,
            QuestionChanges { title: None, content: "second".into(), is_anonymous: false, date_updated: None },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Duplicate(_)));

        // unchanged content on the same row is fine
        let same = update_question(
            &db,
            a.question_id,
            QuestionChanges { title: Some("t".into()), content: "first".into(), is_anonymous: false, date_updated: None },
        )
        .await?;
        assert_eq!(same.title.as_deref(), Some("t"));
        Ok(())
    }

    #[tokio::test]
    async fn update_honours_client_timestamp() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let q = create_question(&db, new_question("when?")).await?;
        let stamp = chrono::DateTime::parse_from_rfc3339("2030-01-01T00:00:00+00:00")?;
        let updated = update_question(
            &db,
            q.question_id,
            QuestionChanges { title: None, content: "when?".into(), is_anonymous: false, date_updated: Some(stamp) },
        )
        .await?;
        assert_eq!(updated.date_updated, stamp);
        Ok(())
    }

    #[tokio::test]
    async fn missing_question_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        assert!(get_question(&db, 404).await?.is_none());
        let err = update_question(
            &db,
            404,
            QuestionChanges { title: None, content: "x".into(), is_anonymous: false, date_updated: None },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert!(matches!(delete_question(&db, 404).await.unwrap_err(), ServiceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn delete_cascades_to_comments() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let q = create_question(&db, new_question("cascade")).await?;
        let other = create_question(&db, new_question("survivor")).await?;
        add_comment(&db, new_comment(q.question_id, "one")).await?;
        add_comment(&db, new_comment(q.question_id, "two")).await?;
        add_comment(&db, new_comment(other.question_id, "stays")).await?;

        let removed = delete_question(&db, q.question_id).await?;
        assert_eq!(removed, 2);
        assert_eq!(count_comments(&db, q.question_id).await?, 0);
        assert!(get_comments(&db, q.question_id).await?.is_empty());
        assert_eq!(count_comments(&db, other.question_id).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn faqs_limited_and_ordered_by_id() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let mut ids = Vec::new();
        for i in 0..12 {
            ids.push(create_question(&db, new_question(&format!("question #{i}"))).await?.question_id);
        }
        add_comment(&db, new_comment(ids[0], "a")).await?;
        add_comment(&db, new_comment(ids[0], "b")).await?;
        add_comment(&db, new_comment(ids[11], "outside the window")).await?;

        let faqs = get_faqs(&db).await?;
        assert_eq!(faqs.len(), FAQ_LIMIT as usize);
        let got: Vec<i32> = faqs.iter().map(|f| f.question.question_id).collect();
        assert_eq!(got, ids[..10].to_vec());

        let first = &faqs[0];
        assert_eq!(first.question.num_comments, 2);
        assert_eq!(first.comments.iter().map(|c| c.content.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(faqs[1].comments.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn faq_entry_serializes_labelled_comments() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let q = create_question(&db, new_question("json shape")).await?;
        add_comment(&db, new_comment(q.question_id, "labelled")).await?;
        let faqs = get_faqs(&db).await?;
        let v = serde_json::to_value(&faqs)?;
        assert_eq!(v[0]["question_id"], q.question_id);
        assert_eq!(v[0]["num_comments"], 1);
        assert_eq!(v[0]["comments"][0]["content"], "labelled");
        assert_eq!(v[0]["comments"][0]["is_anonymous"], true);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_deletes_of_one_question_succeed_once() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let q = create_question(&db, new_question("Delete race")).await?;
        add_comment(&db, new_comment(q.question_id, "gone with it")).await?;

        let mut handles = Vec::new();
        for _ in 0..2 {
            let db = db.clone();
            let qid = q.question_id;
            handles.push(tokio::spawn(async move { delete_question(&db, qid).await }));
        }
        let mut removed = Vec::new();
        for h in handles {
            match h.await? {
                Ok(n) => removed.push(n),
                Err(e) => assert!(matches!(e, ServiceError::NotFound(_))),
            }
        }
        assert_eq!(removed, vec![1]);
        assert!(get_question(&db, q.question_id).await?.is_none());
        Ok(())
    }
}
