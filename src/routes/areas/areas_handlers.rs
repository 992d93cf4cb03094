use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use serde_json::json;
use sqlx::MySqlPool;

use super::areas_models::{AreaResource, CreateAreaRequest, UpdateAreaRequest};
use crate::auth::AuthedUser;
use crate::models::area::Area;

const AREA_SELECT: &str = "SELECT area_id, area_name, area_description FROM Areas_";

pub async fn list_areas(pool: web::Data<MySqlPool>, _user: AuthedUser) -> impl Responder {
    let query_str = format!("{} ORDER BY area_name", AREA_SELECT);

    match sqlx::query_as::<_, Area>(&query_str)
        .fetch_all(pool.get_ref())
        .await
    {
        Ok(rows) => {
            let areas: Vec<AreaResource> = rows.into_iter().map(AreaResource::from_row).collect();
            HttpResponse::Ok().json(areas)
        }
        Err(e) => {
            error!("Failed to fetch areas: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch areas" }))
        }
    }
}

pub async fn get_area(
    pool: web::Data<MySqlPool>,
    _user: AuthedUser,
    path: web::Path<i32>,
) -> impl Responder {
    let area_id = path.into_inner();
    let query_str = format!("{} WHERE area_id = ?", AREA_SELECT);

    match sqlx::query_as::<_, Area>(&query_str)
        .bind(area_id)
        .fetch_optional(pool.get_ref())
        .await
    {
        Ok(Some(row)) => HttpResponse::Ok().json(AreaResource::from_row(row)),
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "Area not found" })),
        Err(e) => {
            error!("Failed to fetch area {}: {}", area_id, e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch area" }))
        }
    }
}

pub async fn create_area(
    pool: web::Data<MySqlPool>,
    user: AuthedUser,
    req: web::Json<CreateAreaRequest>,
) -> impl Responder {
    if !user.is_admin() {
        return HttpResponse::Forbidden().json(json!({ "error": "Admin role required" }));
    }

    let name = req.name.trim();
    if name.is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "Name must not be empty" }));
    }

    // Area names are unique.
    match count_by_name(pool.get_ref(), name, None).await {
        Ok(0) => {}
        Ok(_) => {
            return HttpResponse::Conflict().json(json!({ "error": "Area name already exists" }));
        }
        Err(e) => {
            error!("Failed to check area name {}: {}", name, e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to check area name" }));
        }
    }

    let insert_result = sqlx::query("INSERT INTO Areas_ (area_name, area_description) VALUES (?, ?)")
        .bind(name)
        .bind(&req.description)
        .execute(pool.get_ref())
        .await;

    let area_id = match insert_result {
        Ok(result) => result.last_insert_id() as i32,
        Err(e) => {
            error!("Failed to insert area {}: {}", name, e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to create area" }));
        }
    };

    info!("Area {} ({}) created", area_id, name);
    HttpResponse::Created().json(AreaResource {
        id: area_id,
        name: name.to_string(),
        description: req.description.clone(),
    })
}

pub async fn update_area(
    pool: web::Data<MySqlPool>,
    user: AuthedUser,
    path: web::Path<i32>,
    req: web::Json<UpdateAreaRequest>,
) -> impl Responder {
    if !user.is_admin() {
        return HttpResponse::Forbidden().json(json!({ "error": "Admin role required" }));
    }

    let area_id = path.into_inner();
    let query_str = format!("{} WHERE area_id = ?", AREA_SELECT);

    let current = match sqlx::query_as::<_, Area>(&query_str)
        .bind(area_id)
        .fetch_optional(pool.get_ref())
        .await
    {
        Ok(Some(area)) => area,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({ "error": "Area not found" }));
        }
        Err(e) => {
            error!("Failed to fetch area {}: {}", area_id, e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to fetch area" }));
        }
    };

    let name = match &req.name {
        Some(name) if name.trim().is_empty() => {
            return HttpResponse::BadRequest().json(json!({ "error": "Name must not be empty" }));
        }
        Some(name) => name.trim().to_string(),
        None => current.area_name,
    };

    match count_by_name(pool.get_ref(), &name, Some(area_id)).await {
        Ok(0) => {}
        Ok(_) => {
            return HttpResponse::Conflict().json(json!({ "error": "Area name already exists" }));
        }
        Err(e) => {
            error!("Failed to check area name {}: {}", name, e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to check area name" }));
        }
    }

    let description = req.description.clone().or(current.area_description);

    let update_result =
        sqlx::query("UPDATE Areas_ SET area_name = ?, area_description = ? WHERE area_id = ?")
            .bind(&name)
            .bind(&description)
            .bind(area_id)
            .execute(pool.get_ref())
            .await;

    match update_result {
        Ok(_) => HttpResponse::Ok().json(AreaResource {
            id: area_id,
            name,
            description,
        }),
        Err(e) => {
            error!("Failed to update area {}: {}", area_id, e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to update area" }))
        }
    }
}

pub async fn delete_area(
    pool: web::Data<MySqlPool>,
    user: AuthedUser,
    path: web::Path<i32>,
) -> impl Responder {
    if !user.is_admin() {
        return HttpResponse::Forbidden().json(json!({ "error": "Admin role required" }));
    }

    let area_id = path.into_inner();

    // Tasks in the deleted area survive without an area.
    if let Err(e) = sqlx::query("UPDATE Tasks_ SET area_id = NULL WHERE area_id = ?")
        .bind(area_id)
        .execute(pool.get_ref())
        .await
    {
        error!("Failed to detach tasks from area {}: {}", area_id, e);
        return HttpResponse::InternalServerError()
            .json(json!({ "error": "Failed to detach tasks" }));
    }

    match sqlx::query("DELETE FROM Areas_ WHERE area_id = ?")
        .bind(area_id)
        .execute(pool.get_ref())
        .await
    {
        Ok(result) if result.rows_affected() == 0 => {
            HttpResponse::NotFound().json(json!({ "error": "Area not found" }))
        }
        Ok(_) => {
            info!("Area {} deleted", area_id);
            HttpResponse::Ok().json(json!({ "success": true, "message": "Area deleted" }))
        }
        Err(e) => {
            error!("Failed to delete area {}: {}", area_id, e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to delete area" }))
        }
    }
}

async fn count_by_name(
    pool: &MySqlPool,
    name: &str,
    exclude_area_id: Option<i32>,
) -> Result<i64, sqlx::Error> {
    let row = match exclude_area_id {
        Some(area_id) => {
            sqlx::query_as::<_, (i64,)>(
                "SELECT COUNT(*) FROM Areas_ WHERE area_name = ? AND area_id != ?",
            )
            .bind(name)
            .bind(area_id)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM Areas_ WHERE area_name = ?")
                .bind(name)
                .fetch_one(pool)
                .await?
        }
    };
    Ok(row.0)
}
