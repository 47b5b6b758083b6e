//! Template catalog. Anyone signed in may browse; staff manage.

use tracing::info;

use bidbuilder_shared::TemplateId;
use bidbuilder_store::{Database, NewTemplate, StoreError, Template, User};

use crate::error::{missing, ServerError};
use crate::policy::{self, Action, Resource};
use crate::service::required;

fn duplicate_name(err: StoreError) -> ServerError {
    match err {
        StoreError::Conflict(_) => {
            ServerError::Conflict("A template with this name already exists".into())
        }
        other => other.into(),
    }
}

fn normalized(template: &NewTemplate) -> Result<NewTemplate, ServerError> {
    Ok(NewTemplate {
        name: required(&template.name, "name")?,
        ..template.clone()
    })
}

pub fn create(db: &Database, actor: &User, template: &NewTemplate) -> Result<Template, ServerError> {
    policy::authorize(actor, Resource::Global, Action::ManageTemplates)?;
    let template = db.insert_template(&normalized(template)?).map_err(duplicate_name)?;
    info!(template_id = template.id, name = %template.name, "template created");
    Ok(template)
}

pub fn list(db: &Database, _actor: &User) -> Result<Vec<Template>, ServerError> {
    Ok(db.list_templates()?)
}

pub fn get(db: &Database, _actor: &User, id: TemplateId) -> Result<Template, ServerError> {
    db.get_template(id).map_err(missing("Template"))
}

pub fn update(
    db: &Database,
    actor: &User,
    id: TemplateId,
    template: &NewTemplate,
) -> Result<Template, ServerError> {
    policy::authorize(actor, Resource::Global, Action::ManageTemplates)?;
    let template = normalized(template)?;
    db.update_template(id, &template).map_err(|err| match err {
        StoreError::NotFound => ServerError::NotFound("Template not found".into()),
        other => duplicate_name(other),
    })
}

/// Proposals created from the template keep their copied fields; their
/// template reference is cleared.
pub fn delete(db: &Database, actor: &User, id: TemplateId) -> Result<(), ServerError> {
    policy::authorize(actor, Resource::Global, Action::ManageTemplates)?;
    if !db.delete_template(id)? {
        return Err(ServerError::NotFound("Template not found".into()));
    }
    info!(template_id = id, "template deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing;
    use bidbuilder_shared::Role;

    fn named(name: &str) -> NewTemplate {
        NewTemplate {
            name: name.into(),
            sections: vec!["Intro".into(), "Budget".into()],
            ..Default::default()
        }
    }

    #[test]
    fn duplicate_name_conflicts() {
        let db = testing::db();
        let mgr = testing::account(&db, "mgr", Role::Manager);
        create(&db, &mgr, &named("T1")).unwrap();

        assert!(matches!(
            create(&db, &mgr, &named("T1")),
            Err(ServerError::Conflict(_))
        ));

        let other = create(&db, &mgr, &named("T2")).unwrap();
        assert!(matches!(
            update(&db, &mgr, other.id, &named("T1")),
            Err(ServerError::Conflict(_))
        ));
    }

    #[test]
    fn users_browse_but_do_not_manage() {
        let db = testing::db();
        let mgr = testing::account(&db, "mgr", Role::Manager);
        let user = testing::account(&db, "u", Role::User);
        let t = create(&db, &mgr, &named("T1")).unwrap();

        assert_eq!(list(&db, &user).unwrap().len(), 1);
        assert_eq!(get(&db, &user, t.id).unwrap().sections, vec!["Intro", "Budget"]);
        assert!(matches!(
            create(&db, &user, &named("T9")),
            Err(ServerError::Forbidden(_))
        ));
        assert!(matches!(
            delete(&db, &user, t.id),
            Err(ServerError::Forbidden(_))
        ));
    }

    #[test]
    fn delete_and_missing() {
        let db = testing::db();
        let admin = testing::account(&db, "root", Role::Admin);
        let t = create(&db, &admin, &named("T1")).unwrap();

        delete(&db, &admin, t.id).unwrap();
        assert!(matches!(get(&db, &admin, t.id), Err(ServerError::NotFound(_))));
        assert!(matches!(delete(&db, &admin, t.id), Err(ServerError::NotFound(_))));
    }
}
