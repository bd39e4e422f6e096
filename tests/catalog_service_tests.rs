mod common;

use common::*;
use food_order_backend::entities::{FavoriteType, UserRole};
use food_order_backend::error::AppError;
use food_order_backend::models::{
    CreateReviewRequest, FavoriteRequest, PaginationParams, RestaurantQuery, UpdateReviewRequest,
};
use food_order_backend::services::{
    FavoriteService, OrderService, RestaurantService, ReviewService,
};
use rust_decimal::Decimal;

fn review(restaurant_id: i32, rating: i32) -> CreateReviewRequest {
    CreateReviewRequest {
        restaurant_id,
        order_id: None,
        rating,
        comment: Some("Great food".to_string()),
    }
}

#[tokio::test]
async fn test_rating_stats_without_reviews_are_zero() {
    let db = setup_db().await;
    let fixture = seed_fixture(&db).await;
    let service = ReviewService::new(db.clone());

    let stats = service.restaurant_stats(fixture.restaurant.id).await.unwrap();
    assert_eq!(stats.review_count, 0);
    assert_eq!(stats.average_rating, Decimal::ZERO);
    assert_eq!(stats.five_star + stats.one_star, 0);
}

#[tokio::test]
async fn test_reviews_feed_rating_stats() {
    let db = setup_db().await;
    let fixture = seed_fixture(&db).await;
    let alice = seed_user(&db, "alice@example.com", UserRole::Customer).await;
    let bob = seed_user(&db, "bob@example.com", UserRole::Customer).await;
    let service = ReviewService::new(db.clone());

    service
        .create_review(alice.id, review(fixture.restaurant.id, 5))
        .await
        .unwrap();
    service
        .create_review(bob.id, review(fixture.restaurant.id, 4))
        .await
        .unwrap();

    let stats = service.restaurant_stats(fixture.restaurant.id).await.unwrap();
    assert_eq!(stats.review_count, 2);
    assert_eq!(stats.average_rating, Decimal::new(450, 2));
    assert_eq!(stats.five_star, 1);
    assert_eq!(stats.four_star, 1);

    let listed = service
        .list_restaurant_reviews(fixture.restaurant.id, PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(listed.total, 2);
    assert!(listed.items.iter().all(|r| r.user_name.is_some()));

    let restaurants = RestaurantService::new(db.clone())
        .list_restaurants(RestaurantQuery::default())
        .await
        .unwrap();
    assert_eq!(restaurants.items.len(), 1);
    assert_eq!(restaurants.items[0].review_count, 2);
}

#[tokio::test]
async fn test_duplicate_review_conflicts() {
    let db = setup_db().await;
    let fixture = seed_fixture(&db).await;
    let alice = seed_user(&db, "alice@example.com", UserRole::Customer).await;
    let service = ReviewService::new(db.clone());

    service
        .create_review(alice.id, review(fixture.restaurant.id, 5))
        .await
        .unwrap();
    let err = service
        .create_review(alice.id, review(fixture.restaurant.id, 3))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_review_rating_out_of_range_is_rejected() {
    let db = setup_db().await;
    let fixture = seed_fixture(&db).await;
    let alice = seed_user(&db, "alice@example.com", UserRole::Customer).await;
    let service = ReviewService::new(db.clone());

    for rating in [0, 6] {
        assert!(matches!(
            service
                .create_review(alice.id, review(fixture.restaurant.id, rating))
                .await,
            Err(AppError::ValidationError(_))
        ));
    }
}

#[tokio::test]
async fn test_review_order_must_belong_to_reviewer() {
    let db = setup_db().await;
    let fixture = seed_fixture(&db).await;
    let alice = seed_user(&db, "alice@example.com", UserRole::Customer).await;
    let bob = seed_user(&db, "bob@example.com", UserRole::Customer).await;
    let order = OrderService::new(db.clone(), order_config())
        .create_order(alice.id, sample_order(&fixture), None)
        .await
        .unwrap()
        .order;
    let service = ReviewService::new(db.clone());

    let mut request = review(fixture.restaurant.id, 4);
    request.order_id = Some(order.order.id);
    assert!(matches!(
        service.create_review(bob.id, request.clone()).await,
        Err(AppError::NotFound(_))
    ));

    let created = service.create_review(alice.id, request).await.unwrap();
    assert_eq!(created.order_id, Some(order.order.id));
}

#[tokio::test]
async fn test_review_update_and_delete_permissions() {
    let db = setup_db().await;
    let fixture = seed_fixture(&db).await;
    let alice = seed_user(&db, "alice@example.com", UserRole::Customer).await;
    let bob = seed_user(&db, "bob@example.com", UserRole::Customer).await;
    let admin = seed_user(&db, "admin@example.com", UserRole::Admin).await;
    let service = ReviewService::new(db.clone());

    let created = service
        .create_review(alice.id, review(fixture.restaurant.id, 2))
        .await
        .unwrap();

    let updated = service
        .update_review(
            alice.id,
            created.id,
            UpdateReviewRequest {
                rating: Some(3),
                comment: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.rating, 3);

    assert!(matches!(
        service
            .delete_review(bob.id, UserRole::Customer, created.id)
            .await,
        Err(AppError::NotFound(_))
    ));
    service
        .delete_review(admin.id, UserRole::Admin, created.id)
        .await
        .unwrap();

    let stats = service.restaurant_stats(fixture.restaurant.id).await.unwrap();
    assert_eq!(stats.review_count, 0);
}

#[tokio::test]
async fn test_favorites_lifecycle() {
    let db = setup_db().await;
    let fixture = seed_fixture(&db).await;
    let alice = seed_user(&db, "alice@example.com", UserRole::Customer).await;
    let service = FavoriteService::new(db.clone());

    let restaurant_fav = FavoriteRequest {
        favorite_type: FavoriteType::Restaurant,
        favorite_id: fixture.restaurant.id,
    };
    service.add_favorite(alice.id, restaurant_fav).await.unwrap();
    assert!(matches!(
        service.add_favorite(alice.id, restaurant_fav).await,
        Err(AppError::Conflict(_))
    ));

    let dish_fav = FavoriteRequest {
        favorite_type: FavoriteType::MenuItem,
        favorite_id: fixture.pizza.id,
    };
    let status = service.toggle_favorite(alice.id, dish_fav).await.unwrap();
    assert!(status.is_favorite);

    let all = service.list_favorites(alice.id, None).await.unwrap();
    assert_eq!(all.len(), 2);
    let dishes = service
        .list_favorites(alice.id, Some(FavoriteType::MenuItem))
        .await
        .unwrap();
    assert_eq!(dishes.len(), 1);
    assert_eq!(
        dishes[0].menu_item.as_ref().map(|m| m.name.as_str()),
        Some("Margherita")
    );

    let status = service.toggle_favorite(alice.id, dish_fav).await.unwrap();
    assert!(!status.is_favorite);
    assert!(
        !service
            .check_favorite(alice.id, FavoriteType::MenuItem, fixture.pizza.id)
            .await
            .unwrap()
            .is_favorite
    );

    service
        .remove_favorite_by_target(alice.id, FavoriteType::Restaurant, fixture.restaurant.id)
        .await
        .unwrap();
    assert!(matches!(
        service
            .remove_favorite_by_target(alice.id, FavoriteType::Restaurant, fixture.restaurant.id)
            .await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_favorite_target_must_exist() {
    let db = setup_db().await;
    let alice = seed_user(&db, "alice@example.com", UserRole::Customer).await;
    let service = FavoriteService::new(db.clone());

    let err = service
        .add_favorite(
            alice.id,
            FavoriteRequest {
                favorite_type: FavoriteType::Restaurant,
                favorite_id: 42,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_soft_deleted_restaurant_is_hidden() {
    let db = setup_db().await;
    let fixture = seed_fixture(&db).await;
    let service = RestaurantService::new(db.clone());

    service.delete_restaurant(fixture.restaurant.id).await.unwrap();
    assert!(matches!(
        service.get_restaurant(fixture.restaurant.id).await,
        Err(AppError::NotFound(_))
    ));
    let listed = service
        .list_restaurants(RestaurantQuery::default())
        .await
        .unwrap();
    assert!(listed.items.is_empty());

    let categories = service.list_categories(fixture.restaurant.id).await.unwrap();
    assert_eq!(categories, vec!["Mains".to_string()]);
}
