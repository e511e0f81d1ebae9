mod bundles_tests;
mod health_tests;
mod repo_tests;
mod speech_tests;
