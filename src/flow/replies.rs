// src/flow/replies.rs
// User-facing copy. Choice labels double as the text the transport sends back.

pub const CHOICE_SAVE_AS_IS: &str = "Save it as is";
pub const CHOICE_SAVE: &str = "Save";
pub const CHOICE_CANCEL: &str = "Cancel";
pub const CHOICE_CONFIRM_DELETE: &str = "Yes, delete";

pub const GREETING: &str = "Hi!\n\n\
I keep references for your characters close at hand, so you can send them anywhere in a couple of taps.\n\n\
Use /help for the full walkthrough.";

pub const HELP: &str = "<b>How this works</b>\n\n\
1. Send /add, then the character's name (or any title for the reference).\n\
2. Send the reference as a file (\"send without compression\"). A photo works too, but it loses quality.\n\
3. In any chat, type my @username followed by a space. Your references show up right there; tap one to send it.\n\
Typing part of a name narrows the list. <code>*</code> matches any run of characters and <code>?</code> matches one.\n\n\
To delete a reference, send /del and pick it the same way.";

pub const UNKNOWN_COMMAND: &str = "I don't know that command. Try /help.";

pub const ASK_NAME: &str = "What's the character's name, or the title of the reference you want to add?";
pub const NAME_TOO_LONG: &str = "That name is too long, let's keep it under 128 characters.";
pub const NAME_TOO_SHORT: &str = "That name is too short, give me at least a couple of letters.";
pub const ASK_MEDIA: &str = "Great, now send the reference as a file.";
pub const PHOTO_NOT_FILE: &str = "That came in as a photo, not a file.\n\
I can save it like this if you want, but photos are compressed and lose some quality.";
pub const CONVERTED_CAPTION: &str = "Made a photo copy of the file too, for convenience.";
pub const COULD_NOT_PROCESS: &str = "Couldn't process that file. Please try sending it again.";
pub const READY_TO_SAVE: &str = "All set. Save it?";
pub const DUPLICATE_NAME: &str = "You already have a reference with that name! Please pick another name.";
pub const SAVED: &str = "Done, the reference is saved. It will show up in my inline menu shortly.";
pub const CANCELLED: &str = "Cancelled.";
pub const SOMETHING_BROKE: &str = "Something broke on my side, sorry. Please try again in a bit.";

pub const ASK_DELETE_TARGET: &str = "Okay, now pick the reference you want to delete through inline mode.\n\n\
Type my @username at the start of a message and choose the reference from the list.";
pub const CONFIRM_DELETE: &str = "Do you really want to delete this reference?";
pub const ALREADY_DELETED: &str = "Looks like that reference was already deleted and came from a cache.\n\
It will disappear from the inline menu shortly.";
pub const DELETED: &str = "Reference deleted.";
pub const DELETE_FAILED: &str = "Couldn't delete the reference, it seems to be gone already.";

pub const REMIND_MEDIA: &str = "I'm waiting for the reference file. Send it, or tap Cancel.";
pub const REMIND_ADD_CONFIRMATION: &str = "Tap Save to store the reference, or Cancel to drop it.";
pub const REMIND_DELETE_CONFIRMATION: &str = "Tap \"Yes, delete\" to confirm, or Cancel to keep the reference.";
