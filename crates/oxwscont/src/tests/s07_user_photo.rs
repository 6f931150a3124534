//! S07: SetUserPhoto and GetUserPhoto.
//!
//! Every case applies only to servers that implement SetUserPhoto.

use protocheck_harness::{FaultExpectation, ScenarioResult};

use crate::adapter::ContactsAdapter;
use crate::base::ContactsSuite;
use crate::fixtures;
use crate::messages::GetUserPhotoRequest;
use crate::types::{ResponseClass, ResponseCode, UserPhotoSize};

const SET_USER_PHOTO_SUPPORTED: u32 = 1275114;

/// S07_TC01: a photo that was set can be read back.
pub async fn test_s07_tc01_set_user_photo<A: ContactsAdapter>(
    suite: &mut ContactsSuite<A>,
) -> ScenarioResult {
    suite.site.assume_enabled(SET_USER_PHOTO_SUPPORTED)?;
    let email = fixtures::photo_user_email(&suite.site)?;

    let set = suite
        .set_user_photo(&email, &fixtures::sample_photo())
        .await?;
    suite.site.assert_equal(
        ResponseClass::Success,
        set.class,
        "SetUserPhoto response class",
    )?;
    suite.site.capture(
        302081,
        "[In SetUserPhoto] [The protocol client sends a SetUserPhotoSoapIn request WSDL message] and the protocol server responds with a SetUserPhotoSoapOut response WSDL message",
    )?;
    suite.site.capture(
        SET_USER_PHOTO_SUPPORTED,
        "[In Appendix C: Product Behavior] Implementation does support the SetUserPhoto operation. (Exchange 2016 and above follow this behavior.)",
    )?;

    let photo = suite
        .get_user_photo(GetUserPhotoRequest {
            email,
            size: UserPhotoSize::HR96x96,
        })
        .await?;
    suite.site.capture_if_equal(
        ResponseClass::Success,
        photo.class,
        302024,
        "[In GetUserPhotoSoapOut] A successful GetUserPhoto WSDL operation request returns a GetUserPhotoResponse element with the ResponseClass attribute set to \"Success\".",
    )?;
    suite.site.capture_if_equal(
        ResponseCode::NoError,
        photo.code,
        302025,
        "[In GetUserPhotoSoapOut] [A successful GetUserPhoto WSDL operation request returns a GetUserPhotoResponse element ] The ResponseCode element of the GetUserPhotoResponse element is set to \"No Error\".",
    )
}

/// S07_TC02: the photo can be read at every `UserPhotoSizeType`.
pub async fn test_s07_tc02_user_photo_sizes<A: ContactsAdapter>(
    suite: &mut ContactsSuite<A>,
) -> ScenarioResult {
    suite.site.assume_enabled(SET_USER_PHOTO_SUPPORTED)?;
    let email = fixtures::photo_user_email(&suite.site)?;
    suite
        .set_user_photo(&email, &fixtures::sample_photo())
        .await?;

    for (i, size) in UserPhotoSize::ALL.iter().enumerate() {
        let photo = suite
            .get_user_photo(GetUserPhotoRequest {
                email: email.clone(),
                size: *size,
            })
            .await?;
        let pixels = size.pixels();
        suite.site.capture_if_equal(
            ResponseClass::Success,
            photo.class,
            302068 + i as u32,
            &format!(
                "[In UserPhotoSizeType] {}: Specifies that the image is {} pixels high and {} pixels wide.",
                size, pixels, pixels
            ),
        )?;
    }
    Ok(())
}

/// S07_TC03: after a new photo is set, GetUserPhoto reports the change and
/// returns the picture.
pub async fn test_s07_tc03_change_user_photo<A: ContactsAdapter>(
    suite: &mut ContactsSuite<A>,
) -> ScenarioResult {
    suite.site.assume_enabled(SET_USER_PHOTO_SUPPORTED)?;
    let email = fixtures::photo_user_email(&suite.site)?;
    suite
        .set_user_photo(&email, &fixtures::changed_photo())
        .await?;

    let photo = suite
        .get_user_photo(GetUserPhotoRequest {
            email,
            size: UserPhotoSize::HR96x96,
        })
        .await?;
    suite.site.capture_if_true(
        photo.has_changed,
        30205601,
        "[In GetUserPhotoResponseMessageType] HasChanged element: If the value is true, the photo has changed.",
    )?;
    suite.site.capture_if_some(
        photo.picture_data.as_ref(),
        302058,
        "[In GetUserPhotoResponseMessageType] PictureData element: Specifies the binary data for the picture.",
    )
}

/// S07_TC04: asking for the photo of a mailbox that does not exist yields
/// `ErrorNonExistentMailbox`.
pub async fn test_s07_tc04_photo_of_unknown_mailbox<A: ContactsAdapter>(
    suite: &mut ContactsSuite<A>,
) -> ScenarioResult {
    suite.site.assume_enabled(SET_USER_PHOTO_SUPPORTED)?;
    let domain = suite.site.property("Domain")?;
    let email = format!("{}@{}", suite.site.resource_name("NoSuchUser"), domain);

    let code = suite
        .get_user_photo(GetUserPhotoRequest {
            email,
            size: UserPhotoSize::HR48x48,
        })
        .await
        .expect_item_error("GetUserPhoto")?;
    suite.site.assert_equal(
        ResponseCode::ErrorNonExistentMailbox.as_str(),
        code.as_str(),
        "GetUserPhoto response code",
    )
}
