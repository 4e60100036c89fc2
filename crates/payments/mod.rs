pub mod mayar_client;
