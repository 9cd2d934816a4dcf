use pinkledger::Config;
use rocket::{Build, Rocket};

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    dotenvy::dotenv().ok();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => panic!("Invalid configuration: {}", err),
    };

    pinkledger::build_rocket(config)
}
