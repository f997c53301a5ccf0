use speculate2::speculate;

speculate! {
    use axum::http::{Method, StatusCode};
    use axum_test::{TestResponse, TestServer};
    use pokeserve::api::{self, AppState};
    use pokeserve_core::models::EnemyPokemon;
    use pokeserve_core::{CredentialHasher, Database, PokemonRepository};
    use serde_json::{json, Value};

    fn setup_db() -> Database {
        let db = Database::open_memory().expect("Failed to create test database");
        db.migrate().expect("Failed to migrate test database");
        db
    }

    fn test_server(db: Database) -> TestServer {
        let hasher = CredentialHasher::with_costs(64, 1, 1).expect("Failed to build hasher");
        TestServer::new(api::router(AppState::with_hasher(db, hasher)))
            .expect("Failed to start test server")
    }

    async fn register(server: &TestServer, username: &str, password: &str) -> TestResponse {
        server
            .post("/register")
            .form(&[("username", username), ("password", password)])
            .await
    }

    async fn login(server: &TestServer, username: &str, password: &str) -> TestResponse {
        server
            .get("/login")
            .add_query_param("username", username)
            .add_query_param("password", password)
            .await
    }

    async fn player_id(server: &TestServer, username: &str) -> String {
        server
            .get("/getPlayerID")
            .add_query_param("username", username)
            .await
            .text()
    }

    async fn create_pokemon(server: &TestServer, player_id: &str) -> TestResponse {
        server
            .post("/insertPlayerPokemon")
            .form(&[("playerID", player_id)])
            .await
    }

    async fn write_stats(server: &TestServer, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        server.post(path).form(&fields).await
    }

    describe "accounts" {
        it "registers, rejects the duplicate and logs in" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());

                let first = register(&server, "ash", "pikachu123").await;
                first.assert_status_ok();
                assert_eq!(first.text(), "true");

                let again = register(&server, "ash", "anything").await;
                assert_eq!(again.status_code(), StatusCode::CONFLICT);

                let wrong = login(&server, "ash", "wrong").await;
                wrong.assert_status_ok();
                assert_eq!(wrong.text(), "Password is incorrect");

                let right = login(&server, "ash", "pikachu123").await;
                assert_eq!(right.text(), "true");
            });
        }

        it "explains login failures in the body" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());
                register(&server, "ash", "pikachu123").await;

                assert_eq!(login(&server, "gary", "pikachu123").await.text(), "Username is incorrect");
                assert_eq!(
                    login(&server, "", "").await.text(),
                    pokeserve_core::validation::BOTH_REQUIRED
                );
                assert_eq!(
                    login(&server, "as", "pikachu123").await.text(),
                    pokeserve_core::validation::TOO_SHORT
                );
            });
        }

        it "rejects malformed registrations" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());

                let response = register(&server, "ash", "").await;
                assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
                assert_eq!(response.text(), pokeserve_core::validation::PASSWORD_REQUIRED);
            });
        }

        it "looks up player ids" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());
                register(&server, "ash", "pikachu123").await;

                assert_eq!(player_id(&server, "ash").await, "1");

                let missing = server.get("/getPlayerID").add_query_param("username", "gary").await;
                assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

                let blank = server.get("/getPlayerID").await;
                assert_eq!(blank.status_code(), StatusCode::BAD_REQUEST);
            });
        }

        it "returns the public player record" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());
                register(&server, "ash", "pikachu123").await;

                let player: Value = server
                    .get("/getPlayer")
                    .add_query_param("playerID", "1")
                    .await
                    .json();
                assert_eq!(player["name"], "ash");
                assert_eq!(player["has_security_answer"], false);
                assert!(player.get("password_hash").is_none());
            });
        }

        it "recovers an account through the security answer" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());
                register(&server, "ash", "pikachu123").await;

                let stored = server
                    .post("/securityAnswer")
                    .form(&[("playerID", "1"), ("securityAnswer", "Pallet Town")])
                    .await;
                stored.assert_status_ok();

                let mismatch = server
                    .get("/checkSecurityAnswer")
                    .add_query_param("playerID", "1")
                    .add_query_param("securityAnswer", "Cerulean City")
                    .await;
                assert_eq!(mismatch.status_code(), StatusCode::NOT_FOUND);

                let matched = server
                    .get("/checkSecurityAnswer")
                    .add_query_param("playerID", "1")
                    .add_query_param("securityAnswer", "Pallet Town")
                    .await;
                assert_eq!(matched.text(), "true");

                let reset = server
                    .get("/resetPassword")
                    .add_query_param("playerID", "1")
                    .add_query_param("newPassword", "charizard")
                    .await;
                assert_eq!(reset.text(), "true");

                assert_eq!(login(&server, "ash", "charizard").await.text(), "true");
            });
        }

        it "reports resets for unknown players as not found" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());

                let response = server
                    .get("/resetPassword")
                    .add_query_param("playerID", "99")
                    .add_query_param("newPassword", "charizard")
                    .await;
                assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
            });
        }

        it "rejects non-numeric player ids" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());

                let response = server
                    .get("/checkSecurityAnswer")
                    .add_query_param("playerID", "ash")
                    .add_query_param("securityAnswer", "Pallet Town")
                    .await;
                assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
                assert_eq!(response.text(), "Invalid player ID");
            });
        }
    }

    describe "player pokemon" {
        it "creates a pokemon, attaches stats and reads them back" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());
                register(&server, "ash", "pikachu123").await;

                let created = create_pokemon(&server, "1").await;
                created.assert_status_ok();
                let pokemon_id = created.text();

                let attached = write_stats(&server, "/insertPokemonStats", &[
                    ("pokemonID", pokemon_id.as_str()),
                    ("xp", "0"),
                    ("level", "5"),
                    ("hp", "20"),
                    ("name", "Charmander"),
                    ("evolution", "0"),
                ]).await;
                attached.assert_status_ok();

                let stats: Value = server
                    .get("/getPlayerPokemonStats")
                    .add_query_param("id", &pokemon_id)
                    .await
                    .json();
                assert_eq!(stats, json!({
                    "pokemon_id": pokemon_id.parse::<i64>().unwrap(),
                    "name": "Charmander",
                    "xp": 0,
                    "level": 5,
                    "hp": 20,
                    "evolution": 0,
                }));
            });
        }

        it "reports stats of a fresh pokemon as not found" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());
                register(&server, "ash", "pikachu123").await;
                let pokemon_id = create_pokemon(&server, "1").await.text();

                let response = server
                    .get("/getPlayerPokemonStats")
                    .add_query_param("id", &pokemon_id)
                    .await;
                assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

                let pokemon: Value = server
                    .get("/getPlayerPokemon")
                    .add_query_param("id", &pokemon_id)
                    .await
                    .json();
                assert_eq!(pokemon["player_id"], 1);
                assert!(pokemon["stats"].is_null());
            });
        }

        it "refuses pokemon for unknown players" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());
                assert_eq!(create_pokemon(&server, "7").await.status_code(), StatusCode::NOT_FOUND);
                assert_eq!(create_pokemon(&server, "x").await.status_code(), StatusCode::BAD_REQUEST);
            });
        }

        it "updates stats and refuses a second insert" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());
                register(&server, "ash", "pikachu123").await;
                let pokemon_id = create_pokemon(&server, "1").await.text();
                let fields = |level: &'static str, name: &'static str| {
                    vec![
                        ("pokemonID", pokemon_id.clone()),
                        ("xp", "10".to_string()),
                        ("level", level.to_string()),
                        ("hp", "30".to_string()),
                        ("name", name.to_string()),
                        ("evolution", "1".to_string()),
                    ]
                };

                let missing = server.post("/updatePokemonStats").form(&fields("16", "Charmeleon")).await;
                assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

                server.post("/insertPokemonStats").form(&fields("5", "Charmander")).await.assert_status_ok();
                let twice = server.post("/insertPokemonStats").form(&fields("5", "Charmander")).await;
                assert_eq!(twice.status_code(), StatusCode::CONFLICT);

                server.post("/updatePokemonStats").form(&fields("16", "Charmeleon")).await.assert_status_ok();
                let stats: Value = server
                    .get("/getPlayerPokemonStats")
                    .add_query_param("id", &pokemon_id)
                    .await
                    .json();
                assert_eq!(stats["name"], "Charmeleon");
                assert_eq!(stats["level"], 16);
            });
        }

        it "names the malformed stats field" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());

                let response = write_stats(&server, "/insertPokemonStats", &[
                    ("pokemonID", "1"),
                    ("xp", "lots"),
                    ("level", "5"),
                    ("hp", "20"),
                    ("name", "Charmander"),
                    ("evolution", "0"),
                ]).await;
                assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
                assert_eq!(response.text(), "Invalid XP");
            });
        }

        it "finds a player's pokemon" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());
                register(&server, "ash", "pikachu123").await;

                let none = server.get("/getPlayerPokemonID").add_query_param("playerID", "1").await;
                assert_eq!(none.status_code(), StatusCode::NOT_FOUND);

                let first = create_pokemon(&server, "1").await.text();
                create_pokemon(&server, "1").await;

                let found = server.get("/getPlayerPokemonID").add_query_param("playerID", "1").await;
                assert_eq!(found.text(), first);

                let owned: Vec<Value> = server
                    .get("/getPlayerPokemons")
                    .add_query_param("playerID", "1")
                    .await
                    .json();
                assert_eq!(owned.len(), 2);
            });
        }
    }

    describe "enemy pokemon" {
        it "serves seeded enemies as json" {
            tokio_test::block_on(async {
                let db = setup_db();
                PokemonRepository::new(db.clone())
                    .upsert_enemy_pokemon(&EnemyPokemon {
                        id: 1,
                        name: "Rattata".to_string(),
                        level: 3,
                        hp: 12,
                        special_move: "Quick Attack".to_string(),
                    })
                    .unwrap();
                let server = test_server(db);

                let enemy: EnemyPokemon = server
                    .get("/getEnemyPokemon")
                    .add_query_param("id", "1")
                    .await
                    .json();
                assert_eq!(enemy.name, "Rattata");
                assert_eq!(enemy.special_move, "Quick Attack");

                let missing = server.get("/getEnemyPokemon").add_query_param("id", "2").await;
                assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

                let invalid = server.get("/getEnemyPokemon").add_query_param("id", "one").await;
                assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
            });
        }
    }

    describe "routing" {
        it "answers other methods with method not allowed" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());

                assert_eq!(server.post("/login").await.status_code(), StatusCode::METHOD_NOT_ALLOWED);
                assert_eq!(server.get("/register").await.status_code(), StatusCode::METHOD_NOT_ALLOWED);
                assert_eq!(server.put("/getEnemyPokemon").await.status_code(), StatusCode::METHOD_NOT_ALLOWED);
                assert_eq!(server.delete("/insertPlayerPokemon").await.status_code(), StatusCode::METHOD_NOT_ALLOWED);
            });
        }

        it "does not answer HEAD on GET routes" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());
                register(&server, "ash", "pikachu123").await;

                let login = server
                    .method(Method::HEAD, "/login")
                    .add_query_param("username", "ash")
                    .add_query_param("password", "pikachu123")
                    .await;
                assert_eq!(login.status_code(), StatusCode::METHOD_NOT_ALLOWED);

                let enemy = server
                    .method(Method::HEAD, "/getEnemyPokemon")
                    .add_query_param("id", "1")
                    .await;
                assert_eq!(enemy.status_code(), StatusCode::METHOD_NOT_ALLOWED);
            });
        }
    }

    describe "form parameters" {
        it "treats a POST without a body as missing input" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());

                let register = server.post("/register").await;
                assert_eq!(register.status_code(), StatusCode::BAD_REQUEST);
                assert_eq!(register.text(), pokeserve_core::validation::BOTH_REQUIRED);

                let pokemon = server.post("/insertPlayerPokemon").await;
                assert_eq!(pokemon.status_code(), StatusCode::BAD_REQUEST);
                assert_eq!(pokemon.text(), "Invalid player ID");
            });
        }

        it "accepts POST fields in the query string" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());

                let response = server
                    .post("/register")
                    .add_query_param("username", "ash")
                    .add_query_param("password", "pikachu123")
                    .await;
                response.assert_status_ok();
                assert_eq!(response.text(), "true");
                assert_eq!(login(&server, "ash", "pikachu123").await.text(), "true");
            });
        }

        it "prefers body fields over query fields" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());

                server
                    .post("/register")
                    .add_query_param("username", "gary")
                    .form(&[("username", "ash"), ("password", "pikachu123")])
                    .await
                    .assert_status_ok();

                assert_eq!(player_id(&server, "ash").await, "1");
                let gary = server.get("/getPlayerID").add_query_param("username", "gary").await;
                assert_eq!(gary.status_code(), StatusCode::NOT_FOUND);
            });
        }

        it "ignores bodies that are not urlencoded" {
            tokio_test::block_on(async {
                let server = test_server(setup_db());

                let response = server
                    .post("/register")
                    .json(&serde_json::json!({ "username": "ash", "password": "pikachu123" }))
                    .await;
                assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
            });
        }
    }
}
