//! Registration use-case tests against the mock MSSP.

mod common;

use common::fixtures::{self, AP_ID, MSISDN};
use common::mock_mss::MockMss;
use mss_rest_client::{
    MssClient, MssClientConfig, RegistrationClient, RegistrationRequest, ServiceUrl,
};
use serde_json::json;

const NAMESPACE: &str = "http://www.methics.fi/MReg/v1.0.0";

fn client(url: &str) -> MssClient {
    let config =
        MssClientConfig::new(ServiceUrl::new(url).unwrap(), AP_ID).with_password("testap", "pw");
    MssClient::new(config).unwrap()
}

#[tokio::test]
async fn test_registration_round_trip() {
    let mock = MockMss::fixed(json!({
        "MSS_RegistrationResp": {
            "UseCase": {
                "Name": "ReadUser",
                "Outputs": [
                    {"Name": "state", "Value": "ACTIVE"},
                    {"Name": "certcount", "Value": "2"},
                    {"Name": "autoactivation", "Value": "TRUE"}
                ],
                "Groups": [{"Name": "sim", "Outputs": [{"Name": "iccid", "Value": "8935800000"}]}]
            },
            "Status": {"StatusCode": {"Value": "100"}, "StatusMessage": "REQUEST_OK"}
        }
    }))
    .await;
    let client = client(&mock.url());

    let request = RegistrationRequest::builder(NAMESPACE, "ReadUser")
        .with_target_msisdn(MSISDN)
        .build()
        .unwrap();
    let response = RegistrationClient::new(&client).send(request).await.unwrap();

    assert!(response.is_successful());
    assert_eq!(response.output("state").map(|p| p.string_value()), Some("ACTIVE"));
    assert_eq!(response.output("certcount").and_then(|p| p.int_value()), Some(2));
    assert!(response.output("autoactivation").is_some_and(|p| p.bool_value()));
    assert_eq!(response.groups().len(), 1);

    let request = mock.last_request();
    assert_eq!(request.root_key(), Some("MSS_RegistrationReq"));
    let use_case = &request.body["MSS_RegistrationReq"]["UseCase"];
    assert_eq!(use_case["Name"], "ReadUser");
    assert_eq!(use_case["NameSpace"], NAMESPACE);
    assert_eq!(
        use_case["Inputs"],
        json!([{"Name": "targetmsisdn", "Value": MSISDN}])
    );
}

#[tokio::test]
async fn test_registration_fault_is_returned_as_error() {
    let mock = MockMss::fixed(fixtures::fault("101", "WRONG_PARAM")).await;
    let client = client(&mock.url());
    let request = RegistrationRequest::builder(NAMESPACE, "CreateUser")
        .with_target_msisdn(MSISDN)
        .with_param("language", "fi")
        .build()
        .unwrap();

    let err = RegistrationClient::new(&client)
        .send(request)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "101");
}

#[tokio::test]
async fn test_unexpected_response_type_is_rejected() {
    let mock = MockMss::fixed(fixtures::signature_response(b"sig")).await;
    let client = client(&mock.url());
    let request = RegistrationRequest::builder(NAMESPACE, "ReadUser")
        .build()
        .unwrap();

    let err = RegistrationClient::new(&client)
        .send(request)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "780");
}
