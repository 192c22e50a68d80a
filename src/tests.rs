#[cfg(test)]
mod integration_tests {
    use std::str::FromStr;

    use crate::schemas::ApiResponse;
    use crate::test_utils::test_utils::{
        bearer, create_person, create_salary, login_as, setup_test_server, TEST_PASSWORD,
    };
    use axum::http::StatusCode;
    use rust_decimal::Decimal;
    use serde_json::{json, Value};

    fn amount(value: &Value) -> Decimal {
        match value {
            Value::String(text) => Decimal::from_str(text).unwrap(),
            other => Decimal::from_str(&other.to_string()).unwrap(),
        }
    }

    fn d(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    /// The worked example: 12150.75 total income, 1770.00 deductions, 500.00 tax.
    fn example_salary(year: i32, month: i32) -> Value {
        json!({
            "year": year,
            "month": month,
            "baseSalary": "10000.00",
            "performanceSalary": "1500.25",
            "highTempAllowance": "200.50",
            "computerAllowance": "100.00",
            "mealAllowance": "300.00",
            "otherIncome": "50.00",
            "pensionInsurance": "800.00",
            "medicalInsurance": "200.00",
            "unemploymentInsurance": "20.00",
            "housingFund": "750.00",
            "tax": "500.00"
        })
    }

    fn simple_salary(year: i32, month: i32, base: &str, pension: &str) -> Value {
        json!({
            "year": year,
            "month": month,
            "baseSalary": base,
            "pensionInsurance": pension
        })
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = setup_test_server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_register_login_and_me() {
        let server = setup_test_server().await;
        let (name, value) = login_as(&server, "alice").await;

        let response = server.get("/api/v1/auth/me").add_header(name, value).await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data["username"], "alice");
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let server = setup_test_server().await;
        login_as(&server, "alice").await;

        let response = server
            .post("/api/v1/auth/register")
            .json(&json!({ "username": "alice", "password": TEST_PASSWORD }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let body: Value = response.json();
        assert_eq!(body["code"], "CONFLICT");
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let server = setup_test_server().await;

        let response = server
            .post("/api/v1/auth/register")
            .json(&json!({ "username": "alice", "password": "123" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_failures_share_one_message() {
        let server = setup_test_server().await;
        login_as(&server, "alice").await;

        let wrong_password = server
            .post("/api/v1/auth/login")
            .json(&json!({ "username": "alice", "password": "not-the-password" }))
            .await;
        let unknown_user = server
            .post("/api/v1/auth/login")
            .json(&json!({ "username": "mallory", "password": TEST_PASSWORD }))
            .await;

        wrong_password.assert_status(StatusCode::BAD_REQUEST);
        unknown_user.assert_status(StatusCode::BAD_REQUEST);
        let first: Value = wrong_password.json();
        let second: Value = unknown_user.json();
        assert_eq!(first["error"], "invalid username or password");
        assert_eq!(first["error"], second["error"]);
    }

    #[tokio::test]
    async fn test_requests_without_valid_token_are_unauthorized() {
        let server = setup_test_server().await;

        server.get("/api/v1/persons").await.assert_status(StatusCode::UNAUTHORIZED);

        let (name, value) = bearer("not-a-jwt");
        let response = server.get("/api/v1/persons").add_header(name, value).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_person_crud() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;

        let person_id = create_person(
            &server,
            &auth,
            json!({ "name": "Alice", "pensionHistory": "1000.005" }),
        )
        .await;

        let response = server
            .get(&format!("/api/v1/persons/{person_id}"))
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["name"], "Alice");
        // Rounded half away from zero to cents
        assert_eq!(amount(&body.data["pensionHistory"]), d("1000.01"));

        let response = server
            .put(&format!("/api/v1/persons/{person_id}"))
            .add_header(auth.0.clone(), auth.1.clone())
            .json(&json!({ "note": "primary earner" }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["name"], "Alice");
        assert_eq!(body.data["note"], "primary earner");

        let response = server
            .get("/api/v1/persons")
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 1);

        server
            .delete(&format!("/api/v1/persons/{person_id}"))
            .add_header(auth.0.clone(), auth.1.clone())
            .await
            .assert_status(StatusCode::OK);
        server
            .get(&format!("/api/v1/persons/{person_id}"))
            .add_header(auth.0.clone(), auth.1.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_person_validation() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;

        server
            .post("/api/v1/persons")
            .add_header(auth.0.clone(), auth.1.clone())
            .json(&json!({ "name": "   " }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/api/v1/persons")
            .add_header(auth.0.clone(), auth.1.clone())
            .json(&json!({ "name": "Bob", "medicalHistory": "-1" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_persons_are_private_to_their_owner() {
        let server = setup_test_server().await;
        let alice = login_as(&server, "alice").await;
        let bob = login_as(&server, "bob").await;

        let person_id = create_person(&server, &alice, json!({ "name": "Alice" })).await;

        server
            .get(&format!("/api/v1/persons/{person_id}"))
            .add_header(bob.0.clone(), bob.1.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .post(&format!("/api/v1/persons/{person_id}/salaries"))
            .add_header(bob.0.clone(), bob.1.clone())
            .json(&example_salary(2024, 1))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/api/v1/stats/monthly")
            .add_query_param("personId", person_id)
            .add_header(bob.0.clone(), bob.1.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_salary_derives_payroll() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;
        let person_id = create_person(&server, &auth, json!({ "name": "Alice" })).await;

        let record = create_salary(&server, &auth, person_id, example_salary(2024, 1)).await;

        assert_eq!(amount(&record["totalIncome"]), d("12150.75"));
        assert_eq!(amount(&record["grossIncome"]), d("12150.75"));
        assert_eq!(amount(&record["totalDeductions"]), d("1770.00"));
        assert_eq!(amount(&record["tax"]), d("500.00"));
        assert_eq!(amount(&record["netIncome"]), d("9880.75"));
        assert_eq!(amount(&record["nonCashBenefits"]), d("300.00"));
        assert_eq!(amount(&record["actualTakeHome"]), d("9580.75"));
        assert_eq!(amount(&record["lowTempAllowance"]), Decimal::ZERO);
        assert_eq!(record["netIncome"], "9880.75");
    }

    #[tokio::test]
    async fn test_create_salary_with_auto_tax() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;
        let person_id = create_person(&server, &auth, json!({ "name": "Alice" })).await;

        let record = create_salary(
            &server,
            &auth,
            person_id,
            json!({
                "year": 2024,
                "month": 2,
                "baseSalary": 20000,
                "pensionInsurance": 2000,
                "tax": "999.99",
                "autoTax": true
            }),
        )
        .await;

        // 3% of 20000 - 2000 - 5000
        assert_eq!(amount(&record["tax"]), d("390.00"));
        assert_eq!(amount(&record["netIncome"]), d("17610.00"));

        // The calculated tax is what gets stored
        let response = server
            .get(&format!("/api/v1/salaries/{}", record["id"]))
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        let body: ApiResponse<Value> = response.json();
        assert_eq!(amount(&body.data["tax"]), d("390.00"));
    }

    #[tokio::test]
    async fn test_duplicate_month_conflicts() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;
        let person_id = create_person(&server, &auth, json!({ "name": "Alice" })).await;
        create_salary(&server, &auth, person_id, example_salary(2024, 3)).await;

        let response = server
            .post(&format!("/api/v1/persons/{person_id}/salaries"))
            .add_header(auth.0.clone(), auth.1.clone())
            .json(&example_salary(2024, 3))
            .await;

        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_salary_month_out_of_range() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;
        let person_id = create_person(&server, &auth, json!({ "name": "Alice" })).await;

        server
            .post(&format!("/api/v1/persons/{person_id}/salaries"))
            .add_header(auth.0.clone(), auth.1.clone())
            .json(&example_salary(2024, 13))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_amounts_are_rejected() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;
        let person_id = create_person(&server, &auth, json!({ "name": "Alice" })).await;

        // Decimal::MAX plus one would overflow the gross sum
        server
            .post(&format!("/api/v1/persons/{person_id}/salaries"))
            .add_header(auth.0.clone(), auth.1.clone())
            .json(&json!({
                "year": 2024,
                "month": 1,
                "baseSalary": "79228162514264337593543950335",
                "performanceSalary": "1"
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        // Fits a Decimal but not a DECIMAL(15,2) column
        let response = server
            .post(&format!("/api/v1/persons/{person_id}/salaries"))
            .add_header(auth.0.clone(), auth.1.clone())
            .json(&simple_salary(2024, 1, "12345678901234567.89", "0"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("baseSalary"));

        let record = create_salary(&server, &auth, person_id, example_salary(2024, 2)).await;
        server
            .put(&format!("/api/v1/salaries/{}", record["id"]))
            .add_header(auth.0.clone(), auth.1.clone())
            .json(&json!({ "tax": "-10000000000000" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        // Largest storable amount still goes through
        create_salary(
            &server,
            &auth,
            person_id,
            simple_salary(2024, 3, "9999999999999.99", "0"),
        )
        .await;

        let response = server
            .get("/api/v1/salaries")
            .add_query_param("personId", person_id)
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 2);
        assert_eq!(amount(&body.data[0]["tax"]), d("500.00"));

        server
            .post("/api/v1/persons")
            .add_header(auth.0.clone(), auth.1.clone())
            .json(&json!({ "name": "Bob", "pensionHistory": "10000000000000" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/api/v1/salary-templates")
            .add_header(auth.0.clone(), auth.1.clone())
            .json(&json!({ "name": "Huge", "allowancesTemplate": { "meal": 1e20 } }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_and_delete_salary() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;
        let person_id = create_person(&server, &auth, json!({ "name": "Alice" })).await;
        let first = create_salary(&server, &auth, person_id, example_salary(2024, 1)).await;
        create_salary(&server, &auth, person_id, example_salary(2024, 2)).await;

        // Partial update keeps every other field
        let response = server
            .put(&format!("/api/v1/salaries/{}", first["id"]))
            .add_header(auth.0.clone(), auth.1.clone())
            .json(&json!({ "tax": "400.00", "note": "corrected" }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(amount(&body.data["baseSalary"]), d("10000.00"));
        assert_eq!(amount(&body.data["netIncome"]), d("9980.75"));
        assert_eq!(body.data["note"], "corrected");

        // Moving onto an occupied month conflicts
        server
            .put(&format!("/api/v1/salaries/{}", first["id"]))
            .add_header(auth.0.clone(), auth.1.clone())
            .json(&json!({ "month": 2 }))
            .await
            .assert_status(StatusCode::CONFLICT);

        server
            .delete(&format!("/api/v1/salaries/{}", first["id"]))
            .add_header(auth.0.clone(), auth.1.clone())
            .await
            .assert_status(StatusCode::OK);
        server
            .get(&format!("/api/v1/salaries/{}", first["id"]))
            .add_header(auth.0.clone(), auth.1.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_salaries_in_chronological_order() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;
        let person_id = create_person(&server, &auth, json!({ "name": "Alice" })).await;
        create_salary(&server, &auth, person_id, simple_salary(2024, 1, "100", "0")).await;
        create_salary(&server, &auth, person_id, simple_salary(2023, 12, "100", "0")).await;
        create_salary(&server, &auth, person_id, simple_salary(2024, 6, "100", "0")).await;

        let response = server
            .get("/api/v1/salaries")
            .add_query_param("range", "2023-12..2024-03")
            .add_header(auth.0.clone(), auth.1.clone())
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        let periods: Vec<(i64, i64)> = body
            .data
            .iter()
            .map(|row| (row["year"].as_i64().unwrap(), row["month"].as_i64().unwrap()))
            .collect();
        assert_eq!(periods, vec![(2023, 12), (2024, 1)]);
    }

    #[tokio::test]
    async fn test_yearly_and_family_stats() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;
        let alice = create_person(&server, &auth, json!({ "name": "Alice" })).await;
        create_person(&server, &auth, json!({ "name": "Bob" })).await;
        create_salary(&server, &auth, alice, example_salary(2024, 1)).await;
        create_salary(&server, &auth, alice, example_salary(2024, 2)).await;

        server
            .get("/api/v1/stats/yearly")
            .add_header(auth.0.clone(), auth.1.clone())
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .get("/api/v1/stats/yearly")
            .add_query_param("year", 2024)
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["months"], 2);
        assert_eq!(amount(&body.data[0]["totalNet"]), d("19761.50"));
        assert_eq!(amount(&body.data[0]["avgNet"]), d("9880.75"));
        assert_eq!(amount(&body.data[0]["insuranceTotal"]), d("2040.00"));

        let response = server
            .get("/api/v1/stats/family")
            .add_query_param("year", 2024)
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["persons"], 2);
        assert_eq!(body.data["byPerson"].as_array().unwrap().len(), 2);
        assert_eq!(amount(&body.data["totalNet"]), d("19761.50"));
    }

    #[tokio::test]
    async fn test_family_cache_is_invalidated_by_new_records() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;
        let alice = create_person(&server, &auth, json!({ "name": "Alice" })).await;
        create_salary(&server, &auth, alice, simple_salary(2024, 1, "1000", "0")).await;

        let family = |server: &axum_test::TestServer| {
            server
                .get("/api/v1/stats/family")
                .add_query_param("year", 2024)
                .add_header(auth.0.clone(), auth.1.clone())
        };

        let body: ApiResponse<Value> = family(&server).await.json();
        assert_eq!(amount(&body.data["totalNet"]), d("1000.00"));

        create_salary(&server, &auth, alice, simple_salary(2024, 2, "500", "0")).await;

        let body: ApiResponse<Value> = family(&server).await.json();
        assert_eq!(amount(&body.data["totalNet"]), d("1500.00"));
    }

    #[tokio::test]
    async fn test_cumulative_contributions_seed_from_history() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;
        let alice = create_person(
            &server,
            &auth,
            json!({ "name": "Alice", "pensionHistory": "1000.00" }),
        )
        .await;
        create_salary(&server, &auth, alice, simple_salary(2023, 11, "5000", "200")).await;
        create_salary(&server, &auth, alice, simple_salary(2023, 12, "5000", "200")).await;
        create_salary(&server, &auth, alice, simple_salary(2024, 1, "5000", "300")).await;

        server
            .get("/api/v1/stats/contributions/cumulative")
            .add_header(auth.0.clone(), auth.1.clone())
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .get("/api/v1/stats/contributions/cumulative")
            .add_query_param("personId", alice)
            .add_query_param("range", "2024")
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(amount(&body.data[0]["pensionCumulative"]), d("1700.00"));

        // A month is only meaningful within a year
        server
            .get("/api/v1/stats/contributions/cumulative")
            .add_query_param("personId", alice)
            .add_query_param("month", 1)
            .add_header(auth.0.clone(), auth.1.clone())
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .get("/api/v1/stats/contributions/cumulative")
            .add_query_param("personId", alice)
            .add_query_param("year", 2023)
            .add_query_param("month", 12)
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(amount(&body.data[0]["pensionCumulative"]), d("1400.00"));
    }

    #[tokio::test]
    async fn test_waterfall_and_gross_vs_net_use_chart_gross() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;
        let alice = create_person(&server, &auth, json!({ "name": "Alice" })).await;
        create_salary(&server, &auth, alice, example_salary(2024, 1)).await;

        let response = server
            .get("/api/v1/stats/waterfall")
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        // Meal allowance is left out of chart gross, tax is not subtracted
        assert_eq!(amount(&body.data["chartGross"]), d("11850.75"));
        assert_eq!(amount(&body.data["chartNet"]), d("10080.75"));
        let steps = body.data["steps"].as_array().unwrap();
        assert_eq!(steps.len(), 7);
        assert_eq!(amount(&steps[6]["runningTotal"]), d("10080.75"));

        let response = server
            .get("/api/v1/stats/gross-vs-net/monthly")
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(amount(&body.data[0]["chartGross"]), d("11850.75"));
        assert_eq!(amount(&body.data[0]["chartNet"]), d("10080.75"));
    }

    #[tokio::test]
    async fn test_annual_table_growth() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;
        let alice = create_person(&server, &auth, json!({ "name": "Alice" })).await;
        let bob = create_person(&server, &auth, json!({ "name": "Bob" })).await;
        create_salary(&server, &auth, alice, simple_salary(2023, 6, "10000", "0")).await;
        create_salary(&server, &auth, alice, simple_salary(2024, 6, "12000", "0")).await;
        create_salary(&server, &auth, bob, simple_salary(2024, 6, "8000", "0")).await;

        let response = server
            .get("/api/v1/stats/tables/annual")
            .add_query_param("year", 2024)
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 2);

        let alice_row = body.data.iter().find(|row| row["personId"] == alice).unwrap();
        assert_eq!(amount(&alice_row["yoyGrowth"]), d("20.00"));
        assert_eq!(amount(&alice_row["netIncome"]), d("12000.00"));

        // No prior-year income, no growth figure
        let bob_row = body.data.iter().find(|row| row["personId"] == bob).unwrap();
        assert!(bob_row["yoyGrowth"].is_null());
    }

    #[tokio::test]
    async fn test_annual_monthly_table_skips_empty_months() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;
        let alice = create_person(&server, &auth, json!({ "name": "Alice" })).await;
        create_salary(&server, &auth, alice, simple_salary(2024, 3, "1000", "0")).await;

        let response = server
            .get("/api/v1/stats/tables/annual-monthly")
            .add_query_param("year", 2024)
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 12);

        let response = server
            .get("/api/v1/stats/tables/annual-monthly")
            .add_query_param("year", 2024)
            .add_query_param("skipEmpty", true)
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["month"], 3);
    }

    #[tokio::test]
    async fn test_category_endpoints() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;
        let alice = create_person(&server, &auth, json!({ "name": "Alice" })).await;
        create_salary(&server, &auth, alice, example_salary(2024, 1)).await;
        create_salary(&server, &auth, alice, simple_salary(2024, 2, "10000", "800")).await;

        let response = server
            .get("/api/v1/stats/categories")
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data[0]["categoryType"], "income");
        assert_eq!(amount(&body.data[0]["totalAmount"]), d("20000.00"));
        assert_eq!(body.data[0]["usageCount"], 2);

        let response = server
            .get("/api/v1/stats/categories/summary")
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        let body: ApiResponse<Value> = response.json();
        assert_eq!(amount(&body.data["income"]["total"]), d("22150.75"));
        assert_eq!(amount(&body.data["deductions"]["total"]), d("2570.00"));
    }

    #[tokio::test]
    async fn test_templates_default_and_soft_delete() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;

        let create = |body: Value| {
            server
                .post("/api/v1/salary-templates")
                .add_header(auth.0.clone(), auth.1.clone())
                .json(&body)
        };

        let response = create(json!({
            "name": "Standard",
            "allowancesTemplate": { "meal": 300, "transport": "100.5" },
            "isDefault": true
        }))
        .await;
        response.assert_status(StatusCode::CREATED);
        let first: ApiResponse<Value> = response.json();
        assert_eq!(amount(&first.data["allowancesTemplate"]["transport"]), d("100.50"));

        let response = create(json!({ "name": "Summer", "isDefault": true })).await;
        let second: ApiResponse<Value> = response.json();

        // Only the newest default remains
        let response = server
            .get("/api/v1/salary-templates/default")
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        let default: ApiResponse<Value> = response.json();
        assert_eq!(default.data["id"], second.data["id"]);

        server
            .delete(&format!("/api/v1/salary-templates/{}", second.data["id"]))
            .add_header(auth.0.clone(), auth.1.clone())
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .delete(&format!("/api/v1/salary-templates/{}", first.data["id"]))
            .add_header(auth.0.clone(), auth.1.clone())
            .await
            .assert_status(StatusCode::OK);

        let response = server
            .get("/api/v1/salary-templates")
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        let listed: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(listed.data.len(), 1);
        assert_eq!(listed.data[0]["name"], "Summer");

        server
            .get(&format!("/api/v1/salary-templates/{}", first.data["id"]))
            .add_header(auth.0.clone(), auth.1.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_template_rejects_non_numeric_amounts() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;

        server
            .post("/api/v1/salary-templates")
            .add_header(auth.0.clone(), auth.1.clone())
            .json(&json!({ "name": "Broken", "bonusesTemplate": { "spring": "lots" } }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_template_category_stats() {
        let server = setup_test_server().await;
        let auth = login_as(&server, "alice").await;

        for body in [
            json!({ "name": "A", "allowancesTemplate": { "meal": 300, "transport": 100 } }),
            json!({ "name": "B", "allowancesTemplate": { "meal": 200 } }),
        ] {
            server
                .post("/api/v1/salary-templates")
                .add_header(auth.0.clone(), auth.1.clone())
                .json(&body)
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get("/api/v1/salary-templates/category-stats")
            .add_header(auth.0.clone(), auth.1.clone())
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();

        let allowances = body.data["allowances"].as_array().unwrap();
        assert_eq!(allowances[0]["categoryName"], "meal");
        assert_eq!(allowances[0]["usageCount"], 2);
        assert_eq!(amount(&allowances[0]["averageAmount"]), d("250.00"));
        assert_eq!(amount(&allowances[1]["usagePercentage"]), d("50.00"));
        assert!(body.data["bonuses"].as_array().unwrap().is_empty());
    }
}
