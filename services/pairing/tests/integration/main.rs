mod helpers;

mod pairing_test;
