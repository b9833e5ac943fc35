mod bulk_update_tests;
