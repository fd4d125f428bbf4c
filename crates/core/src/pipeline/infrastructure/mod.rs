pub mod threaded_recognition_pipeline;
