//! End-to-end gameplay flow over the public API: traits combine, quests
//! order and complete, a player meets Mitas through the shared world.

use std::sync::Arc;

use mitaworld_domain::{
    common::lock_unpoisoned, Difficulty, DomainError, EncounterOutcome, Entity, LookupItem, Mita,
    MitaCompletion, Player, PlayerCompletion, Quest, QuestLedger, Trait, TraitCatalog, World,
};

fn fire_trait() -> Trait {
    Trait::new(
        "Огненная аура",
        "Мита окружена пламенем",
        "Наносит урон при приближении",
        "Огонь",
    )
    .expect("valid trait")
}

fn shadow_trait() -> Trait {
    Trait::new(
        "Теневой шаг",
        "Мита может перемещаться через тени",
        "Может телепортироваться",
        "Тень",
    )
    .expect("valid trait")
}

#[test]
fn full_gameplay_flow() {
    let world = World::instance();

    // Combine traits through the catalog
    let fire = fire_trait();
    let shadow = shadow_trait();
    let combined = TraitCatalog::global()
        .combine(&fire, &shadow)
        .expect("both operands are traits");
    assert_eq!(combined.name(), "Огненная аура+Теневой шаг");
    assert_eq!(combined.category(), "Combined(Огонь+Тень)");
    assert!(TraitCatalog::global()
        .traits_in_category("Огонь")
        .contains("Огненная аура"));

    // Quests with ordered difficulties
    let revenge = Quest::new(
        "Пламя возмездия",
        "Найти и наказать предателя",
        "Огненный меч",
    )
    .expect("valid quest")
    .with_difficulty(Difficulty::Hard)
    .into_shared();
    let labyrinth = Quest::new(
        "Испытание жаром",
        "Пройти через огненный лабиринт",
        "Устойчивость к огню",
    )
    .expect("valid quest")
    .with_difficulty(Difficulty::VeryHard)
    .into_shared();
    {
        let a = lock_unpoisoned(&revenge);
        let b = lock_unpoisoned(&labyrinth);
        assert!(QuestLedger::global().compare(&*a, &*b).expect("quests") < 0);
        assert!(QuestLedger::global().contains(&b, "лабиринт"));
    }

    // A Mita carrying both, registered in the world
    let ignis = Mita::new(
        "Игнис",
        "Огненная Мита, хранитель пламени",
        vec![fire, combined],
        vec![Arc::clone(&revenge), Arc::clone(&labyrinth)],
    )
    .expect("valid mita")
    .with_category("Огненная")
    .into_shared();
    world.add_mita(&ignis);

    // Indexed and named lookup on the record
    {
        let guard = lock_unpoisoned(&ignis);
        assert!(matches!(
            guard.lookup(0).expect("first trait"),
            LookupItem::Trait(t) if t.name() == "Огненная аура"
        ));
        assert!(matches!(
            guard.lookup("Пламя возмездия").expect("quest by name"),
            LookupItem::Quest(_)
        ));
        assert!(matches!(
            guard.lookup(9),
            Err(DomainError::OutOfRange(9))
        ));
    }

    // The player meets the Mita through the world registry
    let player = Player::new("Аэрин").expect("valid player").into_shared();
    world.add_player(&player);
    let found = world
        .find_mita_by_name("Игнис")
        .expect("registered in the world");
    {
        let mut p = lock_unpoisoned(&player);
        assert!(matches!(
            p.encounter_mita(&found),
            EncounterOutcome::New { .. }
        ));
        assert_eq!(p.active_quest_count(), 2);
        assert!(matches!(
            p.encounter_mita(&ignis),
            EncounterOutcome::AlreadySeen { .. }
        ));
        assert_eq!(p.active_quest_count(), 2);
    }

    // Completion flows through the shared quest reference
    {
        let mut p = lock_unpoisoned(&player);
        let outcome = p.complete_quest("Пламя возмездия");
        assert!(matches!(
            outcome,
            PlayerCompletion::Completed { level: 2, .. }
        ));
        assert_eq!(
            outcome.to_string(),
            "Задание 'Пламя возмездия' выполнено! Награда: Огненный меч\nУровень повышен до 2!"
        );
    }
    assert!(lock_unpoisoned(&revenge).completed());
    {
        let mut guard = lock_unpoisoned(&ignis);
        // The Mita now sees one active quest, and its own completion attempt
        // reports the sentinel
        assert_eq!(guard.active_quests().count(), 1);
        assert_eq!(
            guard.complete_quest("Пламя возмездия"),
            MitaCompletion::NotFound
        );
    }

    // The world lists Mitas before players and iterates repeatedly
    let names: Vec<String> = world.all_entities().map(|e| e.name()).collect();
    assert_eq!(names, world.all_entities().map(|e| e.name()).collect::<Vec<_>>());
    let ignis_pos = names.iter().position(|n| n == "Игнис").expect("mita listed");
    let player_pos = names.iter().position(|n| n == "Аэрин").expect("player listed");
    assert!(ignis_pos < player_pos);

    // Summary renders counts
    let summary = world.to_string();
    assert!(summary.contains("Игровой мир"));
    assert!(summary.contains("Миты: 1"));
    assert!(summary.contains("Игроки: 1"));
}

#[test]
fn entity_rename_contract() {
    let mut player = Player::new("Аэрин").expect("valid player");
    assert!(player.rename("Новая Аэрин").is_ok());
    assert!(matches!(
        player.rename("X"),
        Err(DomainError::Validation(_))
    ));
    assert_eq!(Entity::name(&player), "Новая Аэрин");
    assert!(player.info().contains("Новая Аэрин"));
}
