use field_agent_core::db::open_db_in_memory;
use field_agent_core::{
    Agent, AgentRepository, Alias, AliasRepository, AliasService, ResultType,
    SqliteAgentRepository, SqliteAliasRepository,
};
use rusqlite::Connection;

#[test]
fn add_and_find_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let agent_id = seed_agent(&conn);
    let service = AliasService::new(SqliteAliasRepository::try_new(&conn).unwrap());

    let input = Alias::new("Nightjar", agent_id).with_persona("night courier");
    let actual = service.add(Some(input.clone())).unwrap();
    assert!(actual.is_success());

    let saved = actual.into_payload().unwrap();
    assert!(saved.alias_id > 0);
    assert_eq!(
        Alias {
            alias_id: 0,
            ..saved.clone()
        },
        input
    );
    assert_eq!(service.find_by_id(saved.alias_id).unwrap(), Some(saved));
}

#[test]
fn repeated_name_needs_persona() {
    let conn = open_db_in_memory().unwrap();
    let agent_id = seed_agent(&conn);
    let service = AliasService::new(SqliteAliasRepository::try_new(&conn).unwrap());
    assert!(service
        .add(Some(Alias::new("Nightjar", agent_id)))
        .unwrap()
        .is_success());

    let actual = service.add(Some(Alias::new("Nightjar", agent_id))).unwrap();
    assert_eq!(actual.kind(), ResultType::Invalid);
    assert_eq!(
        actual.messages(),
        ["persona is required if name is duplicated."]
    );

    let actual = service
        .add(Some(Alias::new("Nightjar", agent_id).with_persona("diplomat")))
        .unwrap();
    assert!(actual.is_success());
    assert_eq!(service.find_all().unwrap().len(), 2);
}

#[test]
fn unknown_agent_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = AliasService::new(SqliteAliasRepository::try_new(&conn).unwrap());

    let actual = service.add(Some(Alias::new("Orphan", 12))).unwrap();
    assert_eq!(actual.kind(), ResultType::NotFound);
    assert_eq!(actual.messages(), ["agentId: 12, not found"]);
    assert!(service.find_all().unwrap().is_empty());
}

#[test]
fn id_rules_are_invalid_even_for_unknown_agent() {
    let conn = open_db_in_memory().unwrap();
    let service = AliasService::new(SqliteAliasRepository::try_new(&conn).unwrap());

    let mut preset = Alias::new("Orphan", 77);
    preset.alias_id = 5;
    let actual = service.add(Some(preset)).unwrap();
    assert_eq!(actual.kind(), ResultType::Invalid);
    assert_eq!(
        actual.messages(),
        ["aliasId cannot be set for `add` operation"]
    );

    let actual = service.update(Some(Alias::new("Orphan", 77))).unwrap();
    assert_eq!(actual.kind(), ResultType::Invalid);
    assert_eq!(
        actual.messages(),
        ["aliasId must be set for `update` operation"]
    );
    assert!(service.find_all().unwrap().is_empty());
}

#[test]
fn update_and_delete_lifecycle() {
    let conn = open_db_in_memory().unwrap();
    let agent_id = seed_agent(&conn);
    let service = AliasService::new(SqliteAliasRepository::try_new(&conn).unwrap());
    let mut alias = service
        .add(Some(Alias::new("Kestrel", agent_id)))
        .unwrap()
        .into_payload()
        .unwrap();

    alias.persona = Some("analyst".to_string());
    assert!(service.update(Some(alias.clone())).unwrap().is_success());
    assert_eq!(
        service.find_by_id(alias.alias_id).unwrap().unwrap().persona.as_deref(),
        Some("analyst")
    );

    let mut missing = alias.clone();
    missing.alias_id = 404;
    let actual = service.update(Some(missing)).unwrap();
    assert_eq!(actual.kind(), ResultType::NotFound);
    assert_eq!(actual.messages(), ["aliasId: 404, not found"]);

    assert!(service.delete_by_id(alias.alias_id).unwrap().is_success());
    let actual = service.delete_by_id(alias.alias_id).unwrap();
    assert_eq!(actual.kind(), ResultType::NotFound);
    assert_eq!(actual.messages(), ["alias not found."]);
}

#[test]
fn find_by_agent_id_filters_owner() {
    let conn = open_db_in_memory().unwrap();
    let first = seed_agent(&conn);
    let second = seed_agent(&conn);
    let repo = SqliteAliasRepository::try_new(&conn).unwrap();
    repo.add(&Alias::new("Osprey", first)).unwrap();
    repo.add(&Alias::new("Heron", second)).unwrap();
    repo.add(&Alias::new("Egret", first)).unwrap();

    let names: Vec<_> = repo
        .find_by_agent_id(first)
        .unwrap()
        .into_iter()
        .map(|alias| alias.name)
        .collect();
    assert_eq!(names, ["Osprey", "Egret"]);
    assert!(repo.agent_exists(second).unwrap());
    assert!(!repo.agent_exists(99).unwrap());
}

fn seed_agent(conn: &Connection) -> i64 {
    SqliteAgentRepository::try_new(conn)
        .unwrap()
        .add(&Agent::new("Hazel", "Sauven", 60))
        .unwrap()
        .unwrap()
        .agent_id
}
