use uuid::Uuid;

use couplet_pairing::domain::repository::CoupleRepository;
use couplet_pairing::error::PairingServiceError;
use couplet_pairing::usecase::invite_code::GetActiveInviteCodeUseCase;
use couplet_pairing::usecase::pairing::{
    BreakupUseCase, ConnectWithCodeInput, ConnectWithCodeUseCase,
};

use crate::helpers::{test_code, test_profile, MockWorld};

fn connect_usecase(world: &MockWorld) -> ConnectWithCodeUseCase<MockWorld, MockWorld, MockWorld> {
    ConnectWithCodeUseCase {
        profiles: world.clone(),
        codes: world.clone(),
        couples: world.clone(),
    }
}

fn connect_input(code: &str) -> ConnectWithCodeInput {
    ConnectWithCodeInput {
        code: code.to_owned(),
    }
}

/// World with two unpaired named users and one active code issued by the
/// first. Returns (world, creator_id, joiner_id).
fn paired_up_world(code: &str) -> (MockWorld, Uuid, Uuid) {
    let world = MockWorld::new();
    let creator = test_profile(Some("dana"));
    let joiner = test_profile(Some("sam"));
    let creator_id = creator.id;
    let joiner_id = joiner.id;
    world.add_profile(creator);
    world.add_profile(joiner);
    world.add_code(test_code(creator_id, code, 24));
    (world, creator_id, joiner_id)
}

#[tokio::test]
async fn successful_pairing_consumes_code_and_links_both_members() {
    let (world, creator_id, joiner_id) = paired_up_world("AAAA11");

    let output = connect_usecase(&world)
        .execute(joiner_id, connect_input("AAAA11"))
        .await
        .unwrap();

    let creator = world.profile(creator_id).unwrap();
    let joiner = world.profile(joiner_id).unwrap();
    assert_eq!(creator.couple_id, Some(output.couple_id));
    assert_eq!(joiner.couple_id, Some(output.couple_id));

    let couple = world.find_by_id(output.couple_id).await.unwrap().unwrap();
    assert_eq!(couple.user1_id, creator_id);
    assert_eq!(couple.user2_id, joiner_id);

    let code = world.code("AAAA11").unwrap();
    assert!(code.used);
    assert_eq!(code.used_by, Some(joiner_id));

    // The consumed code no longer shows up as active for its creator.
    let get_active = GetActiveInviteCodeUseCase {
        codes: world.clone(),
    };
    let active = get_active.execute(creator_id).await;
    assert!(matches!(active, Err(PairingServiceError::NoActiveCode)));
}

#[tokio::test]
async fn surrounding_whitespace_in_code_is_tolerated() {
    let (world, _, joiner_id) = paired_up_world("BBBB22");

    let result = connect_usecase(&world)
        .execute(joiner_id, connect_input("  BBBB22  "))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn unknown_code_is_rejected_as_invalid() {
    let (world, _, joiner_id) = paired_up_world("CCCC33");

    let result = connect_usecase(&world)
        .execute(joiner_id, connect_input("ZZZZ99"))
        .await;
    assert!(matches!(result, Err(PairingServiceError::InvalidCode)));
}

#[tokio::test]
async fn consumed_code_is_rejected_as_invalid() {
    let (world, creator_id, joiner_id) = paired_up_world("DDDD44");
    let third = test_profile(Some("kim"));
    let third_id = third.id;
    world.add_profile(third);

    connect_usecase(&world)
        .execute(joiner_id, connect_input("DDDD44"))
        .await
        .unwrap();

    let result = connect_usecase(&world)
        .execute(third_id, connect_input("DDDD44"))
        .await;
    assert!(matches!(result, Err(PairingServiceError::InvalidCode)));

    // Exactly one couple was formed, and the third user stays unpaired.
    assert_eq!(world.couples_len(), 1);
    assert!(world.profile(third_id).unwrap().couple_id.is_none());
    assert!(world.profile(creator_id).unwrap().couple_id.is_some());
}

#[tokio::test]
async fn expired_code_is_rejected_distinctly() {
    let world = MockWorld::new();
    let creator = test_profile(Some("dana"));
    let joiner = test_profile(Some("sam"));
    let creator_id = creator.id;
    let joiner_id = joiner.id;
    world.add_profile(creator);
    world.add_profile(joiner);
    world.add_code(test_code(creator_id, "EEEE55", -1));

    let result = connect_usecase(&world)
        .execute(joiner_id, connect_input("EEEE55"))
        .await;
    assert!(matches!(result, Err(PairingServiceError::ExpiredCode)));
}

#[tokio::test]
async fn own_code_is_rejected() {
    let (world, creator_id, _) = paired_up_world("FFFF66");

    let result = connect_usecase(&world)
        .execute(creator_id, connect_input("FFFF66"))
        .await;
    assert!(matches!(result, Err(PairingServiceError::OwnCode)));
}

#[tokio::test]
async fn stale_code_of_paired_creator_is_rejected() {
    let (world, creator_id, joiner_id) = paired_up_world("GGGG77");
    // A second code issued before the first got redeemed.
    world.add_code(test_code(creator_id, "GGGG78", 24));

    connect_usecase(&world)
        .execute(joiner_id, connect_input("GGGG77"))
        .await
        .unwrap();

    let third = test_profile(Some("kim"));
    let third_id = third.id;
    world.add_profile(third);
    let result = connect_usecase(&world)
        .execute(third_id, connect_input("GGGG78"))
        .await;
    assert!(matches!(
        result,
        Err(PairingServiceError::CreatorAlreadyPaired)
    ));
}

#[tokio::test]
async fn already_paired_joiner_is_rejected() {
    let (world, _, joiner_id) = paired_up_world("HHHH88");
    connect_usecase(&world)
        .execute(joiner_id, connect_input("HHHH88"))
        .await
        .unwrap();

    let lonely = test_profile(Some("kim"));
    let lonely_id = lonely.id;
    world.add_profile(lonely);
    world.add_code(test_code(lonely_id, "HHHH89", 24));

    let result = connect_usecase(&world)
        .execute(joiner_id, connect_input("HHHH89"))
        .await;
    assert!(matches!(result, Err(PairingServiceError::AlreadyPaired)));
    // The rejection left the fresh code untouched.
    assert!(!world.code("HHHH89").unwrap().used);
    assert_eq!(world.couples_len(), 1);
}

#[tokio::test]
async fn race_loser_observes_rejection_not_partial_state() {
    // A joiner whose precondition reads raced ahead of another redemption
    // still hits the store-level compare-and-swap and loses cleanly.
    let (world, creator_id, joiner_id) = paired_up_world("IIII99");
    let code = world.code("IIII99").unwrap();

    world
        .redeem(code.id, creator_id, joiner_id)
        .await
        .unwrap();

    let third = test_profile(Some("kim"));
    let third_id = third.id;
    world.add_profile(third);
    let result = world.redeem(code.id, creator_id, third_id).await;
    assert!(matches!(result, Err(PairingServiceError::InvalidCode)));
    assert_eq!(world.couples_len(), 1);
    assert!(world.profile(third_id).unwrap().couple_id.is_none());
}

#[tokio::test]
async fn rejected_redeem_leaves_the_code_unconsumed() {
    let (world, creator_id, joiner_id) = paired_up_world("LLLL13");
    // Pair the joiner elsewhere first.
    let other = test_profile(Some("kim"));
    let other_id = other.id;
    world.add_profile(other);
    world.add_code(test_code(other_id, "LLLL14", 24));
    connect_usecase(&world)
        .execute(joiner_id, connect_input("LLLL14"))
        .await
        .unwrap();

    // A rejection rolls the whole redemption back: the code stays usable.
    let code = world.code("LLLL13").unwrap();
    let result = world.redeem(code.id, creator_id, joiner_id).await;
    assert!(matches!(result, Err(PairingServiceError::AlreadyPaired)));
    let code = world.code("LLLL13").unwrap();
    assert!(!code.used);
    assert_eq!(code.used_by, None);
    assert!(world.profile(creator_id).unwrap().couple_id.is_none());
}

#[tokio::test]
async fn breakup_unlinks_both_members_and_removes_couple() {
    let (world, creator_id, joiner_id) = paired_up_world("JJJJ10");
    connect_usecase(&world)
        .execute(joiner_id, connect_input("JJJJ10"))
        .await
        .unwrap();

    let breakup = BreakupUseCase {
        profiles: world.clone(),
        couples: world.clone(),
    };
    breakup.execute(creator_id).await.unwrap();

    assert!(world.profile(creator_id).unwrap().couple_id.is_none());
    assert!(world.profile(joiner_id).unwrap().couple_id.is_none());
    assert_eq!(world.couples_len(), 0);

    // Either member breaking up again is no longer paired.
    let result = breakup.execute(joiner_id).await;
    assert!(matches!(result, Err(PairingServiceError::NotPaired)));
}

#[tokio::test]
async fn broken_up_members_can_pair_again() {
    let (world, creator_id, joiner_id) = paired_up_world("KKKK11");
    connect_usecase(&world)
        .execute(joiner_id, connect_input("KKKK11"))
        .await
        .unwrap();

    let breakup = BreakupUseCase {
        profiles: world.clone(),
        couples: world.clone(),
    };
    breakup.execute(joiner_id).await.unwrap();

    world.add_code(test_code(creator_id, "KKKK12", 24));
    let output = connect_usecase(&world)
        .execute(joiner_id, connect_input("KKKK12"))
        .await
        .unwrap();
    assert_eq!(
        world.profile(creator_id).unwrap().couple_id,
        Some(output.couple_id)
    );
}
